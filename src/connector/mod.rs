use async_trait::async_trait;
use thiserror::Error;

use crate::model::Record;
use crate::query::Query;

pub mod memory;

pub use memory::MemoryConnector;

/// Errors from the storage collaborator, propagated verbatim to callers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConnectorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Io(String),
}

/// Storage collaborator consumed by the operation wrappers.
///
/// The dispatch core treats this as an opaque capability: it is invoked only
/// after pre-notification succeeds, with the observer-mutated effective
/// parameters, and its results and errors pass through unchanged.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn find(&self, model: &str, query: &Query) -> Result<Vec<Record>, ConnectorError>;

    async fn create(&self, model: &str, record: Record) -> Result<Record, ConnectorError>;

    async fn create_all(
        &self,
        model: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ConnectorError>;

    /// Atomic lookup-or-insert; the flag reports whether the record was
    /// created by this call.
    async fn find_or_create(
        &self,
        model: &str,
        query: &Query,
        candidate: Record,
    ) -> Result<(Record, bool), ConnectorError>;
}
