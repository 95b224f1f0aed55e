//! Access to the hosted data service.
//!
//! # Architecture
//!
//! - [`DataGateway`] is the whole contract: a filtered/ordered/limited query
//!   and a single-row insert, both over JSON rows
//! - The data service is source of truth - NO local sync, NO caching
//! - Rows are decoded into typed records at this boundary ([`fetch`],
//!   [`create`]), so unknown categories or malformed values surface here
//!
//! # Implementations
//!
//! - [`RestGateway`] - PostgREST over HTTPS (the production service)
//! - [`MemoryGateway`] - in-process tables with failure injection, for tests
//!   and local runs

mod memory;
mod rest;

pub use memory::MemoryGateway;
pub use rest::RestGateway;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use vegore_core::{DietPlan, HealthArticle, Order};

/// Tables exposed by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    DietPlans,
    HealthArticles,
    Orders,
}

impl Collection {
    pub const ALL: [Self; 3] = [Self::DietPlans, Self::HealthArticles, Self::Orders];

    /// The collection stored in `table`.
    #[must_use]
    pub fn from_table(table: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.table() == table)
    }

    /// Table name, e.g. `diet_plans`.
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::DietPlans => "diet_plans",
            Self::HealthArticles => "health_articles",
            Self::Orders => "orders",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

impl Direction {
    /// PostgREST spelling, `asc` or `desc`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Ordering applied to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    /// Newest (largest) values first.
    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Oldest (smallest) values first.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }
}

/// An equality filter: `field = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

/// A read against one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    /// Select every row of `collection`.
    #[must_use]
    pub const fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Keep only rows where `field` equals `value`.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.to_string(),
        });
        self
    }

    /// Order the result.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Cap the number of rows returned.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Errors that can occur when talking to the data service.
///
/// Callers only need to distinguish success from failure; the variants
/// exist for diagnostics.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A row did not match the record type.
    #[error("Invalid {collection} row: {source}")]
    Decode {
        collection: Collection,
        source: serde_json::Error,
    },

    /// An insert returned no row.
    #[error("Insert into {0} returned no row")]
    EmptyInsertResponse(Collection),

    /// The client could not be configured.
    #[error("Invalid gateway configuration: {0}")]
    Config(String),

    /// The service is unreachable or refused the operation.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// The query/insert contract of the hosted data service.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Fetch the rows matching `query`, in the requested order.
    async fn query(&self, query: &Query) -> Result<Vec<Value>, GatewayError>;

    /// Insert `record` into `collection` and return the created row.
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, GatewayError>;
}

/// A typed row of one collection.
pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection holding rows of this type.
    const COLLECTION: Collection;

    /// Column names, used to validate order fields before querying.
    fn fields() -> &'static [&'static str];

    /// Whether `field` is a column of this record type.
    #[must_use]
    fn has_field(field: &str) -> bool {
        Self::fields().contains(&field)
    }
}

impl Record for DietPlan {
    const COLLECTION: Collection = Collection::DietPlans;

    fn fields() -> &'static [&'static str] {
        Self::FIELDS
    }
}

impl Record for HealthArticle {
    const COLLECTION: Collection = Collection::HealthArticles;

    fn fields() -> &'static [&'static str] {
        Self::FIELDS
    }
}

impl Record for Order {
    const COLLECTION: Collection = Collection::Orders;

    fn fields() -> &'static [&'static str] {
        Self::FIELDS
    }
}

/// Run `query` and decode every row as `R`.
///
/// # Errors
///
/// Returns the gateway's error, or [`GatewayError::Decode`] if any row does
/// not match `R`.
pub async fn fetch<R: Record>(
    gateway: &dyn DataGateway,
    query: &Query,
) -> Result<Vec<R>, GatewayError> {
    gateway
        .query(query)
        .await?
        .into_iter()
        .map(|row| decode::<R>(row))
        .collect()
}

/// Insert `payload` into `R`'s collection and decode the created row.
///
/// # Errors
///
/// Returns the gateway's error, or [`GatewayError::Decode`] if the created
/// row does not match `R`.
pub async fn create<R: Record>(
    gateway: &dyn DataGateway,
    payload: &impl Serialize,
) -> Result<R, GatewayError> {
    let body = serde_json::to_value(payload)?;
    let row = gateway.insert(R::COLLECTION, body).await?;
    decode(row)
}

fn decode<R: Record>(row: Value) -> Result<R, GatewayError> {
    serde_json::from_value(row).map_err(|source| GatewayError::Decode {
        collection: R::COLLECTION,
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use vegore_core::PlanCategory;

    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::new(Collection::DietPlans)
            .eq("category", PlanCategory::Keto)
            .order_by(OrderBy::descending("created_at"))
            .limit(3);

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].value, "keto");
        assert_eq!(query.order.unwrap().direction.as_str(), "desc");
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_collection_from_table() {
        assert_eq!(Collection::from_table("orders"), Some(Collection::Orders));
        assert_eq!(Collection::from_table("profiles"), None);
    }

    #[test]
    fn test_record_fields() {
        assert!(DietPlan::has_field("created_at"));
        assert!(HealthArticle::has_field("published_at"));
        assert!(!DietPlan::has_field("published_at"));
    }

    #[test]
    fn test_decode_error_names_collection() {
        let err = decode::<HealthArticle>(json!({"title": "missing fields"})).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Decode {
                collection: Collection::HealthArticles,
                ..
            }
        ));
        assert!(err.to_string().starts_with("Invalid health_articles row"));
    }

    #[test]
    fn test_api_error_display() {
        let err = GatewayError::Api {
            status: 409,
            message: "duplicate key value".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 409 - duplicate key value");
    }
}
