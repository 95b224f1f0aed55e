//! A fake PostgREST endpoint served by axum on an ephemeral port.
//!
//! Requests are decoded from the PostgREST wire format and answered from a
//! [`MemoryGateway`], so tests exercise the real HTTP client end to end.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use vegore_storefront::gateway::{
    Collection, DataGateway, GatewayError, MemoryGateway, OrderBy, Query,
};

/// One request as the fake server received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub table: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub authorization: Option<String>,
    pub prefer: Option<String>,
    pub body: Option<Value>,
}

/// Handle to a running fake server.
#[derive(Clone)]
pub struct FakePostgrest {
    base_url: String,
    api_key: String,
    backend: MemoryGateway,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    failure: Arc<Mutex<Option<(StatusCode, String)>>>,
}

impl FakePostgrest {
    /// Serve `backend`'s tables, accepting only `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn spawn(backend: MemoryGateway, api_key: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let fake = Self {
            base_url: format!("http://{addr}"),
            api_key: api_key.to_string(),
            backend,
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/rest/v1/{table}", get(select).post(insert))
            .with_state(fake.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(fake)
    }

    /// Project URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn backend(&self) -> &MemoryGateway {
        &self.backend
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Answer every following request with `status` and `body`.
    pub fn fail_with(&self, status: StatusCode, body: impl Into<String>) {
        *lock(&self.failure) = Some((status, body.into()));
    }

    /// Stop failing.
    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    fn record(
        &self,
        method: &'static str,
        table: &str,
        headers: &HeaderMap,
        query: Option<String>,
        body: Option<Value>,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        lock(&self.requests).push(RecordedRequest {
            method,
            table: table.to_string(),
            query,
            api_key: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body,
        });
    }

    /// The injected failure or an auth error, if this request should not be
    /// served.
    fn rejection(&self, headers: &HeaderMap) -> Option<Response> {
        if let Some((status, body)) = lock(&self.failure).clone() {
            return Some((status, body).into_response());
        }
        let key = headers.get("apikey").and_then(|v| v.to_str().ok());
        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if key != Some(self.api_key.as_str()) || bearer != Some(self.api_key.as_str()) {
            return Some(postgrest_error(
                StatusCode::UNAUTHORIZED,
                "Invalid API key",
                Some("Double check your Supabase `anon` or `service_role` API key."),
            ));
        }
        None
    }
}

async fn select(
    State(fake): State<FakePostgrest>,
    Path(table): Path<String>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    fake.record("GET", &table, &headers, raw.clone(), None);
    if let Some(rejection) = fake.rejection(&headers) {
        return rejection;
    }
    let Some(collection) = Collection::from_table(&table) else {
        return unknown_table(&table);
    };

    let query = match parse_query(collection, raw.as_deref().unwrap_or_default()) {
        Ok(query) => query,
        Err(message) => return postgrest_error(StatusCode::BAD_REQUEST, &message, None),
    };
    match fake.backend.query(&query).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => backend_error(&e),
    }
}

async fn insert(
    State(fake): State<FakePostgrest>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    fake.record("POST", &table, &headers, None, Some(body.clone()));
    if let Some(rejection) = fake.rejection(&headers) {
        return rejection;
    }
    let Some(collection) = Collection::from_table(&table) else {
        return unknown_table(&table);
    };

    match fake.backend.insert(collection, body).await {
        Ok(row) => {
            let wants_row = headers
                .get("prefer")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("return=representation"));
            if wants_row {
                (StatusCode::CREATED, Json(vec![row])).into_response()
            } else {
                StatusCode::CREATED.into_response()
            }
        }
        Err(e) => backend_error(&e),
    }
}

/// Decode `select=*&field=eq.value&order=field.desc&limit=n`.
fn parse_query(collection: Collection, raw: &str) -> Result<Query, String> {
    let mut query = Query::new(collection);
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "select" => {}
            "order" => {
                let (field, direction) = value
                    .rsplit_once('.')
                    .ok_or_else(|| format!("invalid order '{value}'"))?;
                let order = match direction {
                    "asc" => OrderBy::ascending(field),
                    "desc" => OrderBy::descending(field),
                    other => return Err(format!("invalid order direction '{other}'")),
                };
                query = query.order_by(order);
            }
            "limit" => {
                let limit = value
                    .parse()
                    .map_err(|_| format!("invalid limit '{value}'"))?;
                query = query.limit(limit);
            }
            field => {
                let expected = value
                    .strip_prefix("eq.")
                    .ok_or_else(|| format!("unsupported filter '{field}={value}'"))?;
                query = query.eq(field, expected);
            }
        }
    }
    Ok(query)
}

fn postgrest_error(status: StatusCode, message: &str, hint: Option<&str>) -> Response {
    let body = json!({
        "code": status.as_u16().to_string(),
        "message": message,
        "details": null,
        "hint": hint,
    });
    (status, Json(body)).into_response()
}

fn unknown_table(table: &str) -> Response {
    postgrest_error(
        StatusCode::NOT_FOUND,
        &format!("relation \"public.{table}\" does not exist"),
        None,
    )
}

fn backend_error(error: &GatewayError) -> Response {
    postgrest_error(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string(), None)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
