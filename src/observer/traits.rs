use async_trait::async_trait;
use futures::future::BoxFuture;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::observer::context::HookContext;
use crate::observer::error::ObserverError;

/// Named extension points a model exposes around its persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeLoad,
    AfterLoad,
    BeforeSave,
    AfterSave,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::BeforeLoad => "before load",
            Hook::AfterLoad => "after load",
            Hook::BeforeSave => "before save",
            Hook::AfterSave => "after save",
        }
    }
}

impl std::fmt::Display for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown hook name: {0}")]
pub struct ParseHookError(String);

impl FromStr for Hook {
    type Err = ParseHookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before load" => Ok(Hook::BeforeLoad),
            "after load" => Ok(Hook::AfterLoad),
            "before save" => Ok(Hook::BeforeSave),
            "after save" => Ok(Hook::AfterSave),
            other => Err(ParseHookError(other.to_string())),
        }
    }
}

/// A subscriber registered against a hook on one model.
///
/// Returning `Ok(())` signals continuation; in-place mutations of the context
/// are visible to the next observer in sequence and to the operation that
/// resumes afterward. Returning an error aborts the remaining observers and
/// the enclosing operation, and the error value reaches the caller unchanged.
#[async_trait]
pub trait Observer: Send + Sync {
    /// Observer name for logging and debugging
    fn name(&self) -> &str;

    /// Per-invocation bound; `None` falls back to the configured default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn notify(&self, ctx: &mut HookContext) -> Result<(), ObserverError>;
}

struct FnObserver<F> {
    name: String,
    handler: F,
}

#[async_trait]
impl<F> Observer for FnObserver<F>
where
    F: for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, Result<(), ObserverError>>
        + Send
        + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn notify(&self, ctx: &mut HookContext) -> Result<(), ObserverError> {
        (self.handler)(ctx).await
    }
}

/// Adapt a closure into an observer for quick registration.
///
/// ```
/// use persistence_hooks::{observer_fn, ObserverError};
///
/// let reject_all = observer_fn("reject-all", |_ctx| {
///     Box::pin(async { Err(ObserverError::Security("not allowed".into())) })
/// });
/// assert_eq!(reject_all.name(), "reject-all");
/// ```
pub fn observer_fn<F>(name: impl Into<String>, handler: F) -> Arc<dyn Observer>
where
    F: for<'a> Fn(&'a mut HookContext) -> BoxFuture<'a, Result<(), ObserverError>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnObserver {
        name: name.into(),
        handler,
    })
}
