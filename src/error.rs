use thiserror::Error;

use crate::connector::ConnectorError;
use crate::model::RecordError;
use crate::observer::ObserverError;

/// Caller-facing error for wrapped persistence operations.
///
/// Each variant passes the inner value through unchanged, so callers can
/// tell a hook-originated abort from a storage failure by variant while
/// still seeing exactly the value the observer or connector supplied.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataAccessError {
    #[error(transparent)]
    Hook(#[from] ObserverError),

    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    Record(#[from] RecordError),
}
