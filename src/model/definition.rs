use std::collections::BTreeMap;

use crate::observer::ObserverRegistry;

/// Declared property types for model fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// A named entity type: its declared properties plus the observer registry
/// owned by this model. Registry state is model-scoped by construction, so
/// two models can never cross-notify.
#[derive(Debug)]
pub struct ModelDefinition {
    name: String,
    properties: BTreeMap<String, PropertyType>,
    registry: ObserverRegistry,
}

impl ModelDefinition {
    /// New definition; the `id` property is implicit on every model and is
    /// allocated by the storage connector.
    pub fn new(name: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("id".to_string(), PropertyType::String);
        Self {
            name: name.into(),
            properties,
            registry: ObserverRegistry::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, kind: PropertyType) -> Self {
        self.properties.insert(name.into(), kind);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn property(&self, name: &str) -> Option<PropertyType> {
        self.properties.get(name).copied()
    }

    pub fn registry(&self) -> &ObserverRegistry {
        &self.registry
    }
}
