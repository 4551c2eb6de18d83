use serde_json::Value;
use std::sync::Arc;

use crate::connector::Connector;
use crate::error::DataAccessError;
use crate::observer::{Hook, HookContext, HookNotifier, HookPayload, Observer, ObserverError, Operation};
use crate::query::Query;

pub mod definition;
pub mod record;

pub use definition::{ModelDefinition, PropertyType};
pub use record::{Record, RecordError, ToPlain};

/// A model bound to a storage connector, wrapping each persistence operation
/// with hook dispatch.
///
/// Every operation follows the same state machine: build the context(s), run
/// the "before" hook per unit of work, proceed to the connector only when no
/// observer reported failure, then run the "after" hook on what came back.
/// A reported failure aborts before any storage access for that invocation
/// and reaches the caller verbatim.
pub struct Model {
    definition: Arc<ModelDefinition>,
    connector: Arc<dyn Connector>,
    notifier: HookNotifier,
}

impl Model {
    pub(crate) fn new(definition: ModelDefinition, connector: Arc<dyn Connector>) -> Self {
        Self {
            definition: Arc::new(definition),
            connector,
            notifier: HookNotifier::new(),
        }
    }

    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    /// Subscribe an observer to a hook on this model. Registration order is
    /// invocation order; the same observer may be registered more than once.
    pub fn observe(&self, hook: Hook, observer: Arc<dyn Observer>) {
        self.definition.registry().register(hook, observer);
    }

    pub async fn find(&self, query: Query) -> Result<Vec<Record>, DataAccessError> {
        let mut ctx = HookContext::for_query(self.definition.name(), Operation::Find, query);
        self.notify(Hook::BeforeLoad, &mut ctx).await?;
        let effective = take_query(ctx);

        let records = self.connector.find(self.definition.name(), &effective).await?;

        let mut loaded = Vec::with_capacity(records.len());
        for record in records {
            loaded.push(self.run_after(Hook::AfterLoad, Operation::Find, record).await?);
        }
        Ok(loaded)
    }

    pub async fn create(&self, data: Value) -> Result<Record, DataAccessError> {
        let mut record = Record::from_json(data)?;

        let mut ctx = HookContext::for_record(&self.definition, Operation::Create, &record);
        self.notify(Hook::BeforeSave, &mut ctx).await?;
        fold_into(&ctx, &mut record);

        let created = self.connector.create(self.definition.name(), record).await?;
        self.run_after(Hook::AfterSave, Operation::Create, created).await
    }

    /// Bulk create: one context per element, notified in input order, each
    /// independently built. The first failure aborts the whole call before
    /// any storage access, so no partial writes occur.
    pub async fn create_all(&self, data: Vec<Value>) -> Result<Vec<Record>, DataAccessError> {
        let mut records = Vec::with_capacity(data.len());
        for item in data {
            records.push(Record::from_json(item)?);
        }

        for record in records.iter_mut() {
            let mut ctx = HookContext::for_record(&self.definition, Operation::Create, record);
            self.notify(Hook::BeforeSave, &mut ctx).await?;
            fold_into(&ctx, record);
        }

        let created = self.connector.create_all(self.definition.name(), records).await?;

        let mut saved = Vec::with_capacity(created.len());
        for record in created {
            saved.push(self.run_after(Hook::AfterSave, Operation::Create, record).await?);
        }
        Ok(saved)
    }

    /// Atomic lookup-or-insert with hooks around both halves.
    ///
    /// "before load" always fires, with the effective single-record query
    /// (`limit: 1, offset: 0, skip: 0` normalized in). "before save" fires
    /// only when no existing match satisfies the request: a found record
    /// means no write, so no save notification. The created flag reports
    /// which path was taken.
    pub async fn find_or_create(
        &self,
        query: Query,
        data: Value,
    ) -> Result<(Record, bool), DataAccessError> {
        let mut candidate = Record::from_json(data)?;

        let mut ctx = HookContext::for_query(
            self.definition.name(),
            Operation::FindOrCreate,
            query.into_find_one(),
        );
        self.notify(Hook::BeforeLoad, &mut ctx).await?;
        let effective = take_query(ctx);

        if let Some(found) = self
            .connector
            .find(self.definition.name(), &effective)
            .await?
            .into_iter()
            .next()
        {
            let found = self.run_after(Hook::AfterLoad, Operation::FindOrCreate, found).await?;
            return Ok((found, false));
        }

        let mut ctx =
            HookContext::for_record(&self.definition, Operation::FindOrCreate, &candidate);
        self.notify(Hook::BeforeSave, &mut ctx).await?;
        fold_into(&ctx, &mut candidate);

        // The connector re-checks under its own lock; a concurrent insert
        // between our lookup and this call surfaces as created = false
        let (record, created) = self
            .connector
            .find_or_create(self.definition.name(), &effective, candidate)
            .await?;

        let after_hook = if created { Hook::AfterSave } else { Hook::AfterLoad };
        let record = self.run_after(after_hook, Operation::FindOrCreate, record).await?;
        Ok((record, created))
    }

    async fn notify(&self, hook: Hook, ctx: &mut HookContext) -> Result<(), ObserverError> {
        self.notifier.notify(self.definition.registry(), hook, ctx).await
    }

    /// Run an after-hook over one record, folding context mutations into the
    /// returned value. Mutations are not re-persisted.
    async fn run_after(
        &self,
        hook: Hook,
        operation: Operation,
        mut record: Record,
    ) -> Result<Record, DataAccessError> {
        let mut ctx = HookContext::for_record(&self.definition, operation, &record);
        self.notify(hook, &mut ctx).await?;
        fold_into(&ctx, &mut record);
        Ok(record)
    }
}

fn fold_into(ctx: &HookContext, record: &mut Record) {
    if let Some(snapshot) = ctx.model() {
        record.apply_snapshot(snapshot);
    }
}

fn take_query(ctx: HookContext) -> Query {
    match ctx.payload {
        HookPayload::Query(query) => query,
        // Query contexts are built a few lines above their consumption
        HookPayload::Model(_) => Query::all(),
    }
}
