//! HTTP routes.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use indexmap::IndexMap;
use racksearch_core::{BookRecord, Config, LogicalField, RackError, SearchEngine, SearchMode};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Header carrying the admin secret.
pub const ADMIN_HEADER: &str = "x-admin-secret";

/// Results returned when the request gives no limit.
pub const DEFAULT_LIMIT: usize = 50;

/// Rows shown by `/api/columns` when the request gives no preview size.
pub const DEFAULT_PREVIEW: usize = 5;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
    /// Whether the sheet is currently cached.
    pub sheet_loaded: bool,
}

/// Query string of `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// number, name, location or all (default).
    pub by: Option<String>,
    /// Exact book-number lookup.
    #[serde(default)]
    pub exact: bool,
    pub offset: Option<usize>,
    /// Page size; 0 returns everything.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total matches, before paging.
    pub count: usize,
    pub results: Vec<BookRecord>,
}

/// Query string of `GET /api/columns`.
#[derive(Debug, Default, Deserialize)]
pub struct ColumnsParams {
    /// Rows to preview.
    pub preview: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColumnsResponse {
    pub headers: Vec<String>,
    pub unresolved: Vec<LogicalField>,
    pub duplicates: Vec<String>,
    /// First rows as seen through the column map.
    pub preview: Vec<BookRecord>,
    /// The same rows with every sheet column.
    pub rows: Vec<IndexMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler error mapped onto a status code and a JSON body.
#[derive(Debug)]
pub enum ApiError {
    Rack(RackError),
    /// The request body could not be read.
    BadBody(String),
}

impl From<RackError> for ApiError {
    fn from(err: RackError) -> Self {
        Self::Rack(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::Rack(err) => err,
            Self::BadBody(message) => {
                return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message }))
                    .into_response();
            }
        };
        let (status, message) = match &err {
            RackError::AccessDenied => (StatusCode::FORBIDDEN, err.to_string()),
            e if e.is_load_failure() => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("could not load data: {e}"),
            ),
            RackError::EmptySheetUrl | RackError::UnknownField(_) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            e => {
                tracing::error!("request failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn require_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let candidate = headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    state.gate().verify(candidate)?;
    Ok(())
}

/// Health check endpoint handler.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sheet_loaded: state.has_table().await,
    })
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let mode: SearchMode = params.by.as_deref().unwrap_or_default().parse()?;
    let config = state.store().load();
    let table = state.table(&config).await?;

    let engine = SearchEngine::new(&table, &config.column_map);
    let rows = if params.exact {
        engine.find_by_number(&params.q)
    } else {
        engine.search_mode(mode, &params.q)
    };

    let offset = params.offset.unwrap_or(0);
    let limit = match params.limit.unwrap_or(DEFAULT_LIMIT) {
        0 => usize::MAX,
        n => n,
    };
    let page: Vec<_> = rows.iter().skip(offset).take(limit).copied().collect();

    Ok(Json(SearchResponse {
        count: rows.len(),
        results: engine.project_all(&page),
    }))
}

async fn get_config(State(state): State<AppState>) -> Json<Config> {
    Json(state.store().load())
}

async fn put_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Config>, JsonRejection>,
) -> ApiResult<Json<Config>> {
    require_admin(&state, &headers)?;
    let Json(config) = body?;

    for header in config.column_map.duplicate_headers() {
        tracing::warn!(%header, "column mapped to more than one field");
    }
    state.store().save(&config)?;
    state.clear_table().await;
    Ok(Json(config))
}

async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    require_admin(&state, &headers)?;
    state.clear_table().await;
    Ok(StatusCode::NO_CONTENT)
}

async fn columns(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ColumnsParams>,
) -> ApiResult<Json<ColumnsResponse>> {
    require_admin(&state, &headers)?;

    let config = state.store().load();
    let table = state.table(&config).await?;
    let engine = SearchEngine::new(&table, &config.column_map);
    let limit = params.preview.unwrap_or(DEFAULT_PREVIEW);

    Ok(Json(ColumnsResponse {
        headers: table.headers().to_vec(),
        unresolved: config.column_map.unresolved(&table),
        duplicates: config.column_map.duplicate_headers(),
        preview: engine.preview(limit),
        rows: table.rows().take(limit).map(|row| table.record(row)).collect(),
    }))
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/config", get(get_config).put(put_config))
        .route("/api/refresh", post(refresh))
        .route("/api/columns", get(columns))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
