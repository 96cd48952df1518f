use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tallyworks_core::{DomainError, DomainResult, RecordId};

/// Attribute identifier (e.g. "Color").
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub RecordId);

impl AttributeId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Attribute value identifier (e.g. "Red").
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeValueId(pub RecordId);

impl AttributeValueId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AttributeValueId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Whether picking a value of this attribute produces a distinct variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantCreation {
    Always,
    /// The attribute is informational; its values never split variants.
    NoVariant,
}

/// A product attribute (a variant axis, e.g. "Color", "Size").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    id: AttributeId,
    name: String,
    variant_creation: VariantCreation,
}

impl Attribute {
    pub fn new(id: AttributeId, name: impl Into<String>, variant_creation: VariantCreation) -> Self {
        Self {
            id,
            name: name.into(),
            variant_creation,
        }
    }

    pub fn id(&self) -> AttributeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant_creation(&self) -> VariantCreation {
        self.variant_creation
    }
}

/// One selectable value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    id: AttributeValueId,
    attribute_id: AttributeId,
    name: String,
}

impl AttributeValue {
    pub fn new(id: AttributeValueId, attribute_id: AttributeId, name: impl Into<String>) -> Self {
        Self {
            id,
            attribute_id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> AttributeValueId {
        self.id
    }

    pub fn attribute_id(&self) -> AttributeId {
        self.attribute_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lookup of attributes and their values by id.
#[derive(Debug, Default, Clone)]
pub struct AttributeCatalog {
    attributes: BTreeMap<AttributeId, Attribute>,
    values: BTreeMap<AttributeValueId, AttributeValue>,
}

impl AttributeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attribute(&mut self, attribute: Attribute) {
        self.attributes.insert(attribute.id(), attribute);
    }

    pub fn insert_value(&mut self, value: AttributeValue) {
        self.values.insert(value.id(), value);
    }

    pub fn value(&self, id: AttributeValueId) -> DomainResult<&AttributeValue> {
        self.values
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("attribute value {id}")))
    }

    pub fn attribute_of(&self, value: &AttributeValue) -> DomainResult<&Attribute> {
        self.attributes
            .get(&value.attribute_id())
            .ok_or_else(|| DomainError::not_found(format!("attribute {}", value.attribute_id())))
    }
}
