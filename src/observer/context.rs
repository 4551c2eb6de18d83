use serde_json::{Map, Value};

use crate::model::definition::ModelDefinition;
use crate::model::record::{Record, ToPlain};
use crate::query::Query;

/// Persistence operations that dispatch hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Find,
    Create,
    FindOrCreate,
}

/// The two payload shapes a hook context carries
#[derive(Debug, Clone, PartialEq)]
pub enum HookPayload {
    /// `{ "query": ... }` — the effective read about to execute
    Query(Query),
    /// `{ "model": ... }` — the plain snapshot of one instance
    Model(Map<String, Value>),
}

/// Notification payload handed to each observer in sequence.
///
/// Transient, built once per unit of work. The payload is a plain, deep
/// snapshot: mutating it never aliases connector state, and the operation
/// wrapper folds mutations back after the hook round resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct HookContext {
    pub model_name: String,
    pub operation: Operation,
    pub payload: HookPayload,
}

impl HookContext {
    /// Build the single query context for a read operation.
    pub fn for_query(model_name: impl Into<String>, operation: Operation, query: Query) -> Self {
        Self {
            model_name: model_name.into(),
            operation,
            payload: HookPayload::Query(query),
        }
    }

    /// Build the model context for one write unit of work.
    ///
    /// The snapshot is keyed by the model's declared properties: every
    /// declared property appears, with `null` as the explicit unset marker
    /// for fields storage has not assigned yet (the id of a record about to
    /// be created). Record fields are projected through their plain form and
    /// deep-cloned, so nothing in the payload references internal state.
    pub fn for_record(
        definition: &ModelDefinition,
        operation: Operation,
        record: &Record,
    ) -> Self {
        let mut snapshot = Map::new();
        for property in definition.property_names() {
            snapshot.insert(property.to_string(), Value::Null);
        }
        if let Value::Object(fields) = record.to_plain() {
            for (key, value) in fields {
                snapshot.insert(key, deep_plain(&value));
            }
        }

        Self {
            model_name: definition.name().to_string(),
            operation,
            payload: HookPayload::Model(snapshot),
        }
    }

    /// The plain JSON form observers and tests assert on.
    pub fn to_value(&self) -> Value {
        let mut wrapper = Map::new();
        match &self.payload {
            HookPayload::Query(query) => {
                let query = serde_json::to_value(query)
                    .unwrap_or_else(|_| Value::Object(Map::new()));
                wrapper.insert("query".to_string(), query);
            }
            HookPayload::Model(snapshot) => {
                wrapper.insert("model".to_string(), Value::Object(snapshot.clone()));
            }
        }
        Value::Object(wrapper)
    }

    pub fn query(&self) -> Option<&Query> {
        match &self.payload {
            HookPayload::Query(query) => Some(query),
            HookPayload::Model(_) => None,
        }
    }

    pub fn query_mut(&mut self) -> Option<&mut Query> {
        match &mut self.payload {
            HookPayload::Query(query) => Some(query),
            HookPayload::Model(_) => None,
        }
    }

    pub fn model(&self) -> Option<&Map<String, Value>> {
        match &self.payload {
            HookPayload::Model(snapshot) => Some(snapshot),
            HookPayload::Query(_) => None,
        }
    }

    pub fn model_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match &mut self.payload {
            HookPayload::Model(snapshot) => Some(snapshot),
            HookPayload::Query(_) => None,
        }
    }
}

/// Recursive structural walk producing a detached plain clone.
fn deep_plain(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(deep_plain).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), deep_plain(v)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::definition::PropertyType;
    use serde_json::json;

    fn test_definition() -> ModelDefinition {
        ModelDefinition::new("TestModel").with_property("name", PropertyType::String)
    }

    #[test]
    fn record_context_marks_unset_properties_with_null() {
        let definition = test_definition();
        let record = Record::from_json(json!({ "name": "created" })).unwrap();

        let ctx = HookContext::for_record(&definition, Operation::Create, &record);
        assert_eq!(
            ctx.to_value(),
            json!({ "model": { "id": null, "name": "created" } })
        );
    }

    #[test]
    fn record_context_snapshot_is_detached_from_the_record() {
        let definition = test_definition();
        let mut record = Record::from_json(json!({ "name": "original" })).unwrap();

        let mut ctx = HookContext::for_record(&definition, Operation::Create, &record);
        ctx.model_mut()
            .unwrap()
            .insert("name".to_string(), json!("mutated"));

        assert_eq!(record.get("name"), Some(&json!("original")));
        record.set("name", "changed-later");
        assert_eq!(ctx.model().unwrap().get("name"), Some(&json!("mutated")));
    }

    #[test]
    fn nested_values_are_deep_cloned() {
        let definition = test_definition();
        let record = Record::from_json(json!({
            "name": "outer",
            "details": { "tags": ["a", "b"], "depth": { "level": 2 } }
        }))
        .unwrap();

        let ctx = HookContext::for_record(&definition, Operation::Create, &record);
        assert_eq!(
            ctx.model().unwrap().get("details"),
            Some(&json!({ "tags": ["a", "b"], "depth": { "level": 2 } }))
        );
    }

    #[test]
    fn query_context_serializes_under_the_query_key() {
        let ctx = HookContext::for_query(
            "TestModel",
            Operation::Find,
            Query::new().with_where(json!({ "id": 1 })),
        );
        assert_eq!(ctx.to_value(), json!({ "query": { "where": { "id": 1 } } }));
    }
}
