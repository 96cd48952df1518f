use serde::{Deserialize, Serialize};

use tallyworks_core::{DomainError, DomainResult, RecordId};

/// Unit-of-measure identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UomId(pub RecordId);

impl UomId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for UomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A unit of measure, carrying the rounding precision quantities expressed
/// in it are reported at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uom {
    id: UomId,
    name: String,
    rounding: f64,
}

impl Uom {
    /// `rounding` is the precision step (e.g. `0.01`); it must be finite
    /// and strictly positive.
    pub fn new(id: UomId, name: impl Into<String>, rounding: f64) -> DomainResult<Self> {
        if !rounding.is_finite() || rounding <= 0.0 {
            return Err(DomainError::validation(format!(
                "uom rounding must be a positive finite number, got {rounding}"
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
            rounding,
        })
    }

    /// The default unit: counted in wholes, reported at hundredths.
    pub fn units(id: UomId) -> Self {
        Self {
            id,
            name: "Unit(s)".to_string(),
            rounding: 0.01,
        }
    }

    pub fn id(&self) -> UomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rounding(&self) -> f64 {
        self.rounding
    }
}
