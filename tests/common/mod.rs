use std::sync::{Arc, Mutex, OnceLock};

use anyhow::Result;
use serde_json::{json, Value};

use persistence_hooks::{
    observer_fn, DataSource, Model, ModelDefinition, Observer, ObserverError, PropertyType,
};

/// Shared log of the plain context values observers were invoked with
pub type ContextLog = Arc<Mutex<Vec<Value>>>;

/// Shared log of observer invocation order
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn init_tracing() {
    static TRACING: OnceLock<()> = OnceLock::new();
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A TestModel with a single `name` property, seeded with "first" and
/// "second", backed by the in-memory connector.
pub async fn seeded_model() -> Result<Model> {
    init_tracing();
    let ds = DataSource::memory();
    let model = ds.define_model(
        ModelDefinition::new("TestModel").with_property("name", PropertyType::String),
    );

    model.create(json!({ "name": "first" })).await?;
    model.create(json!({ "name": "second" })).await?;
    Ok(model)
}

pub fn context_log() -> ContextLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Observer that records a plain clone of every context it sees and
/// signals continuation.
pub fn push_context(log: &ContextLog) -> Arc<dyn Observer> {
    let log = Arc::clone(log);
    observer_fn("push-context", move |ctx| {
        let log = log.clone();
        let observed = ctx.to_value();
        Box::pin(async move {
            log.lock().unwrap().push(observed);
            Ok(())
        })
    })
}

/// Observer that records its own name, for invocation-order assertions.
pub fn push_name(log: &CallLog, name: &str) -> Arc<dyn Observer> {
    let log = Arc::clone(log);
    let recorded = name.to_string();
    observer_fn(name.to_string(), move |_ctx| {
        let log = log.clone();
        let recorded = recorded.clone();
        Box::pin(async move {
            log.lock().unwrap().push(recorded);
            Ok(())
        })
    })
}

/// Observer that signals failure with the given error.
pub fn fail_with(error: ObserverError) -> Arc<dyn Observer> {
    observer_fn("fail-with", move |_ctx| {
        let error = error.clone();
        Box::pin(async move { Err(error) })
    })
}

pub fn observed(log: &ContextLog) -> Vec<Value> {
    log.lock().unwrap().clone()
}

pub fn called(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
