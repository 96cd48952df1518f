use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tallyworks_core::{Entity, RecordId};

use crate::attribute::AttributeValueId;
use crate::template::ProductTemplateId;

/// Product variant identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub RecordId);

impl VariantId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for VariantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A concrete sellable product: a template plus one attribute-value
/// combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    id: VariantId,
    template_id: ProductTemplateId,
    attribute_value_ids: BTreeSet<AttributeValueId>,
    active: bool,
    /// Quantity sold of this variant, in the template's uom. Maintained by
    /// the sales reporting side; an input here.
    sales_count: f64,
}

impl ProductVariant {
    pub fn new(
        id: VariantId,
        template_id: ProductTemplateId,
        attribute_value_ids: BTreeSet<AttributeValueId>,
    ) -> Self {
        Self {
            id,
            template_id,
            attribute_value_ids,
            active: true,
            sales_count: 0.0,
        }
    }

    pub fn id_typed(&self) -> VariantId {
        self.id
    }

    pub fn template_id(&self) -> ProductTemplateId {
        self.template_id
    }

    pub fn attribute_value_ids(&self) -> &BTreeSet<AttributeValueId> {
        &self.attribute_value_ids
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn archive(&mut self) {
        self.active = false;
    }

    pub fn sales_count(&self) -> f64 {
        self.sales_count
    }

    pub fn set_sales_count(&mut self, sales_count: f64) {
        self.sales_count = sales_count;
    }
}

impl Entity for ProductVariant {
    type Id = VariantId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
