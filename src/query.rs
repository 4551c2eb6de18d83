use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter specification for read operations.
///
/// Serializes to the exact plain shape observers see in a query context:
/// the `where` key plus pagination keys, pagination only when set. `offset`
/// and `skip` are aliases carried separately so the effective query reflects
/// whichever the caller (or the operation) supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query matching all records.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_where(mut self, where_clause: Value) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Normalize into the effective single-record lookup used by
    /// `find_or_create`: `limit: 1, offset: 0, skip: 0` regardless of what the
    /// caller supplied. The hook context must reflect this effective query,
    /// not the raw input.
    pub fn into_find_one(mut self) -> Self {
        self.limit = Some(1);
        self.offset = Some(0);
        self.skip = Some(0);
        self
    }

    /// Rows to pass over before collecting results. `offset` wins when both
    /// aliases are set.
    pub fn effective_offset(&self) -> i64 {
        self.offset.or(self.skip).unwrap_or(0).max(0)
    }
}
