pub mod config;
pub mod connector;
pub mod datasource;
pub mod error;
pub mod model;
pub mod observer;
pub mod query;

pub use connector::{Connector, ConnectorError};
pub use datasource::DataSource;
pub use error::DataAccessError;
pub use model::{Model, ModelDefinition, PropertyType, Record, RecordError};
pub use observer::{observer_fn, Hook, HookContext, Observer, ObserverError};
pub use query::Query;
