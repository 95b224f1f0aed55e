//! In-process gateway with failure injection.
//!
//! Holds each collection as a list of JSON rows and evaluates queries the
//! way PostgREST does for the subset the storefront uses: equality filters,
//! a single ordering column (nulls sort as the largest value) and a row
//! limit.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::{Collection, DataGateway, Direction, GatewayError, Query};

/// A [`DataGateway`] backed by in-memory tables.
///
/// Clones share the same tables, so a test can keep a handle to inspect
/// inserts after handing the gateway to the code under test.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryTables>>,
}

#[derive(Default)]
struct MemoryTables {
    rows: HashMap<Collection, Vec<Value>>,
    query_failure: Option<String>,
    insert_failure: Option<String>,
    latency: Option<Duration>,
    queries: Vec<Query>,
    inserts: Vec<(Collection, Value)>,
}

impl MemoryGateway {
    /// An empty gateway: every collection has no rows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rows` to `collection`.
    #[must_use]
    pub fn with_rows(self, collection: Collection, rows: impl IntoIterator<Item = Value>) -> Self {
        self.tables()
            .rows
            .entry(collection)
            .or_default()
            .extend(rows);
        self
    }

    /// Make every query fail with [`GatewayError::Unavailable`].
    pub fn fail_queries(&self, reason: impl Into<String>) {
        self.tables().query_failure = Some(reason.into());
    }

    /// Make every insert fail with [`GatewayError::Unavailable`].
    pub fn fail_inserts(&self, reason: impl Into<String>) {
        self.tables().insert_failure = Some(reason.into());
    }

    /// Clear injected failures.
    pub fn recover(&self) {
        let mut tables = self.tables();
        tables.query_failure = None;
        tables.insert_failure = None;
    }

    /// Delay every call by `latency` before it is answered.
    pub fn set_latency(&self, latency: Duration) {
        self.tables().latency = Some(latency);
    }

    /// Every query received, in arrival order.
    #[must_use]
    pub fn queries(&self) -> Vec<Query> {
        self.tables().queries.clone()
    }

    /// Every insert attempted, in arrival order, including failed ones.
    #[must_use]
    pub fn inserts(&self) -> Vec<(Collection, Value)> {
        self.tables().inserts.clone()
    }

    /// Current rows of `collection`.
    #[must_use]
    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        self.tables()
            .rows
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    fn tables(&self) -> MutexGuard<'_, MemoryTables> {
        // A panicking test must not take the other handles down with it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait(&self) {
        let latency = self.tables().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn query(&self, query: &Query) -> Result<Vec<Value>, GatewayError> {
        self.wait().await;

        let mut tables = self.tables();
        tables.queries.push(query.clone());
        if let Some(reason) = &tables.query_failure {
            return Err(GatewayError::Unavailable(reason.clone()));
        }

        let mut rows: Vec<Value> = tables
            .rows
            .get(&query.collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|f| field_matches(row.get(&f.field), &f.value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_fields(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, GatewayError> {
        self.wait().await;

        let mut tables = self.tables();
        tables.inserts.push((collection, record.clone()));
        if let Some(reason) = &tables.insert_failure {
            return Err(GatewayError::Unavailable(reason.clone()));
        }

        let Value::Object(mut row) = record else {
            return Err(GatewayError::Api {
                status: 400,
                message: "insert body must be a JSON object".to_string(),
            });
        };
        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let row = Value::Object(row);
        tables.rows.entry(collection).or_default().push(row.clone());
        Ok(row)
    }
}

/// Equality as PostgREST's `eq.` sees it: compare the textual form.
fn field_matches(field: Option<&Value>, expected: &str) -> bool {
    match field {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

/// Column ordering with missing/null values above everything else.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
