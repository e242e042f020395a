//! HTTP transport - maps REST requests onto [`DataRepository`] calls.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health`: store round trip, returns `{ "ok": true }`.
//! - `GET /data`: list, filtered by the first non-empty of `category`, `name`, `available`.
//! - `POST /data`: create from a JSON or form body. 201 with `Location`.
//! - `GET /data/:id`, `PUT /data/:id`, `DELETE /data/:id`.
//! - `PUT /data/:id/purchase`: atomic purchase.
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use data_service::{api, DataRepository, InMemoryStore};
//!
//! let state = api::AppState::new(DataRepository::new(InMemoryStore::new()), Duration::from_secs(5));
//!
//! // Get the router to compose with other axum routes
//! let app = api::router(state.clone());
//!
//! // Or serve directly
//! api::serve(state, "0.0.0.0:5000").await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use url::form_urlencoded;

use super::body::decode_body;
use super::ApiError;
use crate::data::{is_truthy, Data};
use crate::repository::{DataRepository, RepositoryError};
use crate::store::KeyValueStore;

/// Shared state handed to every handler: the repository and the store timeout.
pub struct AppState<S> {
    repo: Arc<DataRepository<S>>,
    store_timeout: Duration,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            store_timeout: self.store_timeout,
        }
    }
}

impl<S: KeyValueStore + 'static> AppState<S> {
    pub fn new(repo: DataRepository<S>, store_timeout: Duration) -> Self {
        Self {
            repo: Arc::new(repo),
            store_timeout,
        }
    }

    pub fn repo(&self) -> &DataRepository<S> {
        &self.repo
    }

    /// Run a repository call on the blocking pool, bounded by the store timeout.
    ///
    /// On expiry the call is left to finish in the background.
    async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&DataRepository<S>) -> Result<T, RepositoryError> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        let task = tokio::task::spawn_blocking(move || op(&repo));

        match tokio::time::timeout(self.store_timeout, task).await {
            Ok(Ok(result)) => result.map_err(ApiError::from),
            Ok(Err(join)) => Err(ApiError::Internal(format!("store task failed: {}", join))),
            Err(_) => Err(ApiError::Unavailable(format!(
                "store did not respond within {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }
}

/// Build an axum `Router` serving the Data API.
pub fn router<S: KeyValueStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_handler).fallback(method_not_allowed))
        .route(
            "/data",
            get(list_handler)
                .post(create_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/data/:id",
            get(get_handler)
                .put(update_handler)
                .delete(delete_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/data/:id/purchase",
            put(purchase_handler).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API over HTTP at the given address (e.g. `"0.0.0.0:5000"`).
pub async fn serve<S: KeyValueStore + 'static>(
    state: AppState<S>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(status = self.status_code(), "{}", self.message());
        } else {
            info!(status = self.status_code(), "{}", self.message());
        }
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}

/// Query filters for `GET /data`.
///
/// A repeated key keeps its first value; unknown keys are ignored.
#[derive(Debug, Default, PartialEq)]
struct ListQuery {
    category: Option<String>,
    name: Option<String>,
    available: Option<String>,
}

impl ListQuery {
    fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "category" => &mut query.category,
                "name" => &mut query.name,
                "available" => &mut query.available,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        query
    }
}

/// Path ids are integers; anything else names no resource.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Data with id '{}' was not found.", raw)))
}

/// Resolve the `:id` segment. A segment axum cannot decode (e.g. invalid
/// UTF-8) names no resource either.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    match path {
        Ok(Path(raw)) => parse_id(&raw),
        Err(rejection) => Err(ApiError::NotFound(format!(
            "Data with the requested id was not found: {}",
            rejection.body_text()
        ))),
    }
}

fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| {
        ApiError::BadRequest(format!("could not read body: {}", rejection.body_text()))
    })
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

fn location(headers: &HeaderMap, id: u64) -> String {
    match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}/data/{}", host, id),
        None => format!("/data/{}", id),
    }
}

fn render(data: &Data) -> Value {
    Value::Object(data.to_fields())
}

/// `GET /health`
async fn health_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Value>, ApiError> {
    state
        .run(|repo| Ok(repo.store().all_ids()?.len()))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// `GET /data`
async fn list_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Value>>, ApiError> {
    let query = ListQuery::parse(raw.as_deref());
    let non_empty = |v: Option<String>| v.filter(|v| !v.is_empty());

    let datas = if let Some(category) = non_empty(query.category) {
        state.run(move |repo| repo.find_by_category(&category)).await?
    } else if let Some(name) = non_empty(query.name) {
        state.run(move |repo| repo.find_by_name(&name)).await?
    } else if let Some(available) = non_empty(query.available) {
        let available = is_truthy(&available);
        state
            .run(move |repo| repo.find_by_availability(available))
            .await?
    } else {
        state.run(|repo| repo.list_all()).await?
    };

    Ok(Json(datas.iter().map(render).collect()))
}

/// `GET /data/:id`
async fn get_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path)?;
    let data = state
        .run(move |repo| repo.find(id)?.ok_or(RepositoryError::NotFound(id)))
        .await?;
    Ok(Json(render(&data)))
}

/// `POST /data`
async fn create_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let body = read_body(body)?;
    let payload = decode_body(content_type(&headers), &body)?;
    let data = Data::from_payload(&payload)?;

    let data = state.run(move |repo| repo.create(data)).await?;
    info!(id = data.id, "created Data");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location(&headers, data.id))],
        Json(render(&data)),
    )
        .into_response())
}

/// `PUT /data/:id`
async fn update_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path)?;
    let body = read_body(body)?;
    let payload = decode_body(content_type(&headers), &body)?;
    let data = Data::from_payload(&payload)?;

    let data = state.run(move |repo| repo.update(id, data)).await?;
    Ok(Json(render(&data)))
}

/// `DELETE /data/:id`
async fn delete_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    // A non-numeric id can't exist, so there is nothing to delete.
    if let Ok(id) = path_id(path) {
        state.run(move |repo| repo.delete(id)).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /data/:id/purchase`
async fn purchase_handler<S: KeyValueStore + 'static>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path)?;
    let data = state.run(move |repo| repo.purchase(id)).await?;
    info!(id, "purchased Data");
    Ok(Json(render(&data)))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!(
        "The method {} is not allowed for the requested URL {}.",
        method,
        uri.path()
    ))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("The requested URL {} was not found.", uri.path()))
}
