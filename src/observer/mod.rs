// Observer system: named hooks on models with ordered, short-circuiting
// asynchronous fan-out around persistence operations

pub mod context;
pub mod error;
pub mod notifier;
pub mod registry;
pub mod traits;

// Re-export core types
pub use context::{HookContext, HookPayload, Operation};
pub use error::ObserverError;
pub use notifier::HookNotifier;
pub use registry::ObserverRegistry;
pub use traits::{observer_fn, Hook, Observer, ParseHookError};
