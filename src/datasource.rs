use std::sync::Arc;

use crate::connector::{Connector, MemoryConnector};
use crate::model::{Model, ModelDefinition};

/// Owns the connector handle and hands out models bound to it.
pub struct DataSource {
    connector: Arc<dyn Connector>,
}

impl DataSource {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Data source backed by the in-memory reference connector.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryConnector::new()))
    }

    /// Bind a model definition to this data source's connector. The model
    /// owns its observer registry; models defined on the same source share
    /// storage but never share observers.
    pub fn define_model(&self, definition: ModelDefinition) -> Model {
        tracing::debug!("Defined model {}", definition.name());
        Model::new(definition, self.connector.clone())
    }
}
