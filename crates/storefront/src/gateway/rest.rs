//! PostgREST client for the hosted data service.
//!
//! Reads are `GET /rest/v1/{table}` with the query encoded as URL
//! parameters; inserts are `POST /rest/v1/{table}` asking for the created
//! row back (`Prefer: return=representation`).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::{Collection, DataGateway, GatewayError, Query};
use crate::config::SupabaseConfig;

/// Longest body excerpt carried into an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Longest body excerpt written to the log.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// RestGateway
// =============================================================================

/// Client for the PostgREST endpoint of a Supabase project.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct RestGateway {
    inner: Arc<RestGatewayInner>,
}

struct RestGatewayInner {
    client: reqwest::Client,
    rest_url: Url,
    api_key: String,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl RestGateway {
    /// Create a client for the project at `config.url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the REST endpoint cannot be
    /// derived from the project URL.
    pub fn new(config: &SupabaseConfig) -> Result<Self, GatewayError> {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Same as [`RestGateway::new`].
    pub fn with_client(
        config: &SupabaseConfig,
        client: reqwest::Client,
    ) -> Result<Self, GatewayError> {
        let rest_url = rest_endpoint(&config.url)?;

        Ok(Self {
            inner: Arc::new(RestGatewayInner {
                client,
                rest_url,
                api_key: config.expose_anon_key().to_string(),
            }),
        })
    }

    /// Base URL all table paths are resolved against.
    #[must_use]
    pub fn rest_url(&self) -> &Url {
        &self.inner.rest_url
    }

    /// URL for a read, with filters, ordering and limit as parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the table path cannot be joined.
    pub fn query_url(&self, query: &Query) -> Result<Url, GatewayError> {
        let mut url = self.table_url(query.collection)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            for filter in &query.filters {
                pairs.append_pair(&filter.field, &format!("eq.{}", filter.value));
            }
            if let Some(order) = &query.order {
                pairs.append_pair(
                    "order",
                    &format!("{}.{}", order.field, order.direction.as_str()),
                );
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }

    fn table_url(&self, collection: Collection) -> Result<Url, GatewayError> {
        self.inner
            .rest_url
            .join(collection.table())
            .map_err(|e| GatewayError::Config(format!("bad table path '{collection}': {e}")))
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .header("Accept", "application/json")
    }

    /// Send a request and return the parsed JSON body.
    async fn execute(
        &self,
        collection: Collection,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(%status, %collection, "Data service unavailable");
            return Err(GatewayError::Unavailable(format!("HTTP {status}")));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                %status,
                %collection,
                body = %excerpt(&body, LOG_BODY_LIMIT),
                "Data service returned non-success status"
            );
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                %collection,
                body = %excerpt(&body, LOG_BODY_LIMIT),
                "Failed to parse data service response"
            );
            GatewayError::Parse(e)
        })
    }
}

#[async_trait]
impl DataGateway for RestGateway {
    #[instrument(skip(self), fields(collection = %query.collection))]
    async fn query(&self, query: &Query) -> Result<Vec<Value>, GatewayError> {
        let url = self.query_url(query)?;
        debug!(%url, "Querying data service");

        let body = self
            .execute(query.collection, self.request(reqwest::Method::GET, url))
            .await?;

        match body {
            Value::Array(rows) => Ok(rows),
            other => Err(GatewayError::Api {
                status: StatusCode::OK.as_u16(),
                message: format!("expected an array of rows, got {}", kind(&other)),
            }),
        }
    }

    #[instrument(skip(self, record), fields(collection = %collection))]
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, GatewayError> {
        let url = self.table_url(collection)?;
        let request = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&record);

        match self.execute(collection, request).await? {
            Value::Array(rows) => rows
                .into_iter()
                .next()
                .ok_or(GatewayError::EmptyInsertResponse(collection)),
            row @ Value::Object(_) => Ok(row),
            _ => Err(GatewayError::EmptyInsertResponse(collection)),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// `{project}/rest/v1/`, with the trailing slash so table names join beneath it.
fn rest_endpoint(base: &Url) -> Result<Url, GatewayError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("rest/v1/")
        .map_err(|e| GatewayError::Config(format!("bad project URL '{base}': {e}")))
}

/// Prefer PostgREST's own message; otherwise a bounded excerpt of the body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(PostgrestError {
            message: Some(message),
            hint,
        }) => match hint {
            Some(hint) if !hint.is_empty() => format!("{message} ({hint})"),
            _ => message,
        },
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => excerpt(body, ERROR_BODY_LIMIT),
    }
}

fn excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use vegore_core::ArticleCategory;

    use super::*;
    use crate::gateway::OrderBy;

    fn gateway(base: &str) -> RestGateway {
        let config = SupabaseConfig {
            url: Url::parse(base).unwrap(),
            anon_key: SecretString::from("anon"),
        };
        RestGateway::new(&config).unwrap()
    }

    #[test]
    fn test_rest_endpoint() {
        assert_eq!(
            gateway("https://abcd.supabase.co").rest_url().as_str(),
            "https://abcd.supabase.co/rest/v1/"
        );
        assert_eq!(
            gateway("http://localhost:54321/proxy").rest_url().as_str(),
            "http://localhost:54321/proxy/rest/v1/"
        );
    }

    #[test]
    fn test_query_url() {
        let query = Query::new(Collection::HealthArticles)
            .eq("category", ArticleCategory::Nutrition)
            .order_by(OrderBy::descending("published_at"))
            .limit(3);

        let url = gateway("https://abcd.supabase.co").query_url(&query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abcd.supabase.co/rest/v1/health_articles?select=*&category=eq.nutrition&order=published_at.desc&limit=3"
        );
    }

    #[test]
    fn test_query_url_plain_select() {
        let url = gateway("https://abcd.supabase.co")
            .query_url(&Query::new(Collection::DietPlans))
            .unwrap();
        assert_eq!(url.query(), Some("select=*"));
    }

    #[test]
    fn test_error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42P01","message":"relation \"public.orders\" does not exist","details":null,"hint":null}"#;
        assert_eq!(
            error_message(body),
            "relation \"public.orders\" does not exist"
        );
    }

    #[test]
    fn test_error_message_includes_hint() {
        let body = r#"{"message":"permission denied","hint":"check row level security"}"#;
        assert_eq!(
            error_message(body),
            "permission denied (check row level security)"
        );
    }

    #[test]
    fn test_error_message_truncates_plain_body() {
        let body = "x".repeat(1000);
        assert_eq!(error_message(&body).len(), ERROR_BODY_LIMIT);
        assert_eq!(error_message("  "), "empty response body");
    }
}
