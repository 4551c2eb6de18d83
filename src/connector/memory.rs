use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::connector::{Connector, ConnectorError};
use crate::model::Record;
use crate::query::Query;

/// In-memory reference connector.
///
/// Exists so the crate is usable and testable standalone; the dispatch core
/// never depends on it. One row store per model name, equality matching on
/// the `where` clause, `order`/`offset`/`skip`/`limit` applied in that order.
#[derive(Default)]
pub struct MemoryConnector {
    collections: Arc<RwLock<HashMap<String, Vec<Map<String, Value>>>>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(row: &Map<String, Value>, where_clause: Option<&Value>) -> bool {
        let Some(Value::Object(conditions)) = where_clause else {
            return true;
        };
        conditions
            .iter()
            .all(|(field, expected)| row.get(field) == Some(expected))
    }

    fn apply_query(rows: &[Map<String, Value>], query: &Query) -> Vec<Map<String, Value>> {
        let mut selected: Vec<Map<String, Value>> = rows
            .iter()
            .filter(|row| Self::matches(row, query.where_clause.as_ref()))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            let (field, descending) = parse_order(order);
            selected.sort_by(|a, b| {
                let ordering = compare_values(a.get(&field), b.get(&field));
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        let offset = query.effective_offset() as usize;
        let mut selected: Vec<_> = selected.into_iter().skip(offset).collect();
        if let Some(limit) = query.limit {
            selected.truncate(limit.max(0) as usize);
        }
        selected
    }

    fn store_row(rows: &mut Vec<Map<String, Value>>, mut record: Record) -> Record {
        if record.id().is_none() {
            record.set_id(Uuid::new_v4());
        }
        rows.push(record.to_map());
        record
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn find(&self, model: &str, query: &Query) -> Result<Vec<Record>, ConnectorError> {
        let collections = self.collections.read().await;
        let rows = collections.get(model).map(Vec::as_slice).unwrap_or_default();
        let selected = Self::apply_query(rows, query);

        tracing::debug!(
            "Memory connector: find on {} matched {} of {} rows",
            model,
            selected.len(),
            rows.len()
        );
        Ok(selected.into_iter().map(Record::from_stored).collect())
    }

    async fn create(&self, model: &str, record: Record) -> Result<Record, ConnectorError> {
        let mut collections = self.collections.write().await;
        let rows = collections.entry(model.to_string()).or_default();
        Ok(Self::store_row(rows, record))
    }

    async fn create_all(
        &self,
        model: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ConnectorError> {
        let mut collections = self.collections.write().await;
        let rows = collections.entry(model.to_string()).or_default();
        Ok(records
            .into_iter()
            .map(|record| Self::store_row(rows, record))
            .collect())
    }

    async fn find_or_create(
        &self,
        model: &str,
        query: &Query,
        candidate: Record,
    ) -> Result<(Record, bool), ConnectorError> {
        // Single write lock covers the re-check and the insert
        let mut collections = self.collections.write().await;
        let rows = collections.entry(model.to_string()).or_default();

        if let Some(existing) = Self::apply_query(rows, query).into_iter().next() {
            return Ok((Record::from_stored(existing), false));
        }
        Ok((Self::store_row(rows, candidate), true))
    }
}

fn parse_order(order: &str) -> (String, bool) {
    let mut parts = order.split_whitespace();
    let field = parts.next().unwrap_or_default().to_string();
    let descending = parts
        .next()
        .map(|dir| dir.eq_ignore_ascii_case("desc"))
        .unwrap_or(false);
    (field, descending)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> MemoryConnector {
        let connector = MemoryConnector::new();
        for name in ["alpha", "beta", "gamma"] {
            connector
                .create("TestModel", Record::from_json(json!({ "name": name })).unwrap())
                .await
                .unwrap();
        }
        connector
    }

    #[tokio::test]
    async fn create_allocates_an_id() {
        let connector = MemoryConnector::new();
        let created = connector
            .create("TestModel", Record::from_json(json!({ "name": "x" })).unwrap())
            .await
            .unwrap();
        assert!(created.id().is_some());
    }

    #[tokio::test]
    async fn find_matches_on_field_equality() {
        let connector = seeded().await;
        let found = connector
            .find("TestModel", &Query::new().with_where(json!({ "name": "beta" })))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("name"), Some(&json!("beta")));
    }

    #[tokio::test]
    async fn pagination_applies_offset_then_limit() {
        let connector = seeded().await;
        let page = connector
            .find(
                "TestModel",
                &Query::new().with_order("name ASC").with_skip(1).with_limit(1),
            )
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].get("name"), Some(&json!("beta")));
    }

    #[tokio::test]
    async fn find_or_create_reuses_an_existing_match() {
        let connector = seeded().await;
        let query = Query::new().with_where(json!({ "name": "alpha" })).into_find_one();
        let (record, created) = connector
            .find_or_create(
                "TestModel",
                &query,
                Record::from_json(json!({ "name": "alpha" })).unwrap(),
            )
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(record.get("name"), Some(&json!("alpha")));

        let query = Query::new().with_where(json!({ "name": "delta" })).into_find_one();
        let (_, created) = connector
            .find_or_create(
                "TestModel",
                &query,
                Record::from_json(json!({ "name": "delta" })).unwrap(),
            )
            .await
            .unwrap();
        assert!(created);
    }

    #[tokio::test]
    async fn models_do_not_share_rows() {
        let connector = seeded().await;
        let other = connector.find("OtherModel", &Query::all()).await.unwrap();
        assert!(other.is_empty());
    }
}
