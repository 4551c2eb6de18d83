use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::config;
use crate::observer::context::HookContext;
use crate::observer::error::ObserverError;
use crate::observer::registry::ObserverRegistry;
use crate::observer::traits::Hook;

/// Drives sequential fan-out of one hook over one context.
///
/// Observers run strictly in registration order, never concurrently; each is
/// awaited to completion before the next starts, so in-place context
/// mutations are visible downstream. The first reported failure stops the
/// sequence and is returned exactly as the observer supplied it.
pub struct HookNotifier {
    default_timeout: Option<Duration>,
}

impl HookNotifier {
    /// Notifier with the per-observer bound from the hook configuration;
    /// a configured value of zero disables the bound.
    pub fn new() -> Self {
        let ms = config().hooks.default_timeout_ms;
        Self {
            default_timeout: (ms > 0).then(|| Duration::from_millis(ms)),
        }
    }

    pub fn with_default_timeout(default_timeout: Option<Duration>) -> Self {
        Self { default_timeout }
    }

    pub async fn notify(
        &self,
        registry: &ObserverRegistry,
        hook: Hook,
        ctx: &mut HookContext,
    ) -> Result<(), ObserverError> {
        let observers = registry.subscribers_for(hook);
        if observers.is_empty() {
            tracing::trace!("No observers registered for hook '{}' - continuing", hook);
            return Ok(());
        }

        tracing::debug!(
            "Dispatching hook '{}' on model {} to {} observers",
            hook,
            ctx.model_name,
            observers.len()
        );

        for observer in observers {
            let started = Instant::now();
            let bound = observer.timeout().or(self.default_timeout);

            let result = match bound {
                Some(limit) if !limit.is_zero() => {
                    match timeout(limit, observer.notify(ctx)).await {
                        Ok(result) => result,
                        Err(_) => Err(ObserverError::Timeout {
                            observer: observer.name().to_string(),
                            waited: limit,
                        }),
                    }
                }
                _ => observer.notify(ctx).await,
            };

            match result {
                Ok(()) => {
                    tracing::debug!(
                        "Observer: {} completed hook '{}' in {:?}",
                        observer.name(),
                        hook,
                        started.elapsed()
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        "Observer: {} failed hook '{}' in {:?}: {}",
                        observer.name(),
                        hook,
                        started.elapsed(),
                        error
                    );
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}

impl Default for HookNotifier {
    fn default() -> Self {
        Self::new()
    }
}
