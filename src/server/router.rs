use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json,
};
use log::{debug, error, info};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::StringRegistry;
use crate::query::{FilterSet, Interpretation};
use crate::{Error, Result, StringRecord};

/// HTTP front end over a [`StringRegistry`].
pub struct Server {
    registry: Arc<StringRegistry>,
}

impl Server {
    pub fn new(registry: Arc<StringRegistry>) -> Self {
        Self { registry }
    }

    /// Builds the axum router with all routes and permissive CORS.
    pub fn router(&self) -> axum::Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        axum::Router::new()
            .route("/", get(handle_root))
            .route("/health", get(handle_health))
            .route("/strings", get(handle_list).post(handle_create))
            .route("/strings/", get(handle_list).post(handle_create))
            .route(
                "/strings/filter-by-natural-language",
                get(handle_natural_language),
            )
            .route("/strings/{value}", get(handle_get).delete(handle_delete))
            .layer(cors)
            .with_state(self.registry.clone())
    }

    /// Binds `addr` and serves until `shutdown` resolves.
    pub async fn listen_with_shutdown<F>(&self, addr: &str, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener. In-flight requests finish after
    /// `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("String Analyzer listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// An [`Error`] on its way out as an HTTP response.
struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::DuplicateValue => (StatusCode::CONFLICT, "duplicate_value"),
            Error::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            Error::ConflictingFilters { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "conflicting_filters")
            }
            Error::UnparsableQuery(_) => (StatusCode::BAD_REQUEST, "unparsable_query"),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input"),
            Error::Internal(_) | Error::Io(_) => {
                error!("request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        Self { status, code, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail { code: self.code, message: self.message },
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

// ============ Response bodies ============

#[derive(Serialize)]
struct ListResponse {
    data: Vec<StringRecord>,
    count: usize,
    filters_applied: Option<FilterSet>,
}

#[derive(Serialize)]
struct NaturalLanguageResponse {
    data: Vec<StringRecord>,
    count: usize,
    interpreted_query: Interpretation,
}

// ============ Handlers ============

async fn handle_root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "String Analyzer API",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": "in-memory",
    }))
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_create(
    State(registry): State<Arc<StringRegistry>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StringRecord>)> {
    let Json(body) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let value = match body.get("value") {
        None | Some(serde_json::Value::Null) => {
            return Err(Error::InvalidRequest("missing \"value\" field".to_string()).into())
        }
        Some(serde_json::Value::String(s)) => s,
        Some(_) => return Err(Error::InvalidInput("\"value\" must be a string".to_string()).into()),
    };

    let record = registry.create(value).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn handle_get(
    State(registry): State<Arc<StringRegistry>>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<Json<StringRecord>> {
    let Path(value) = path.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    Ok(Json(registry.get(&value).await?))
}

async fn handle_list(
    State(registry): State<Arc<StringRegistry>>,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Json<ListResponse>> {
    let Query(params) = query.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let filters = FilterSet::from_query_params(&params)?;
    let data = registry.list(&filters).await?;
    debug!("list with {:?} matched {} records", filters, data.len());

    Ok(Json(ListResponse {
        count: data.len(),
        data,
        filters_applied: (!filters.is_empty()).then_some(filters),
    }))
}

async fn handle_natural_language(
    State(registry): State<Arc<StringRegistry>>,
    query: std::result::Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Json<NaturalLanguageResponse>> {
    let Query(params) = query.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let query = params
        .get("query")
        .ok_or_else(|| Error::InvalidRequest("missing query parameter".to_string()))?;

    let (interpreted_query, data) = registry.filter_natural_language(query).await?;
    Ok(Json(NaturalLanguageResponse {
        count: data.len(),
        data,
        interpreted_query,
    }))
}

async fn handle_delete(
    State(registry): State<Arc<StringRegistry>>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(value) = path.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    registry.delete(&value).await?;
    Ok(StatusCode::NO_CONTENT)
}
