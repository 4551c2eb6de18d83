use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Errors that can occur while shaping input data into records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid input format: {0}")]
    InvalidInput(String),
}

/// Deterministic plain-value projection of internal state.
///
/// Everything that can end up nested inside a hook context implements this;
/// the context builder walks the projection recursively so observers only
/// ever see plain JSON, never live references into connector state.
pub trait ToPlain {
    fn to_plain(&self) -> Value;
}

/// A dynamic record representing one instance of a model.
///
/// Fields are plain JSON values; the identifier is allocated by the storage
/// connector, so a record built from caller input has no `id` until a write
/// completes.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from caller-supplied JSON. Only objects are accepted.
    pub fn from_json(json: Value) -> Result<Self, RecordError> {
        match json {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            other => Err(RecordError::InvalidInput(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Build one record per element of a JSON array, in input order.
    pub fn from_json_array(json: Value) -> Result<Vec<Self>, RecordError> {
        match json {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    Self::from_json(item).map_err(|e| {
                        RecordError::InvalidInput(format!("item {}: {}", index, e))
                    })
                })
                .collect(),
            other => Err(RecordError::InvalidInput(format!(
                "expected a JSON array, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Rehydrate a record from connector row data (system fields allowed).
    pub fn from_stored(data: Map<String, Value>) -> Self {
        Self {
            fields: data.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn id(&self) -> Option<Uuid> {
        self.get("id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn set_id(&mut self, id: Uuid) -> &mut Self {
        self.set("id", Value::String(id.to_string()))
    }

    /// Replace this record's fields with an observer-mutated snapshot.
    ///
    /// Null entries are the "unset" marker in snapshots (an id not yet
    /// allocated, a field an observer cleared) and translate back to the
    /// field being absent.
    pub fn apply_snapshot(&mut self, snapshot: &Map<String, Value>) -> &mut Self {
        self.fields.clear();
        for (key, value) in snapshot {
            if !value.is_null() {
                self.fields.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl ToPlain for Record {
    fn to_plain(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_stored(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.to_plain()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record(id: {:?}, fields: {})", self.id(), self.fields.len())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
