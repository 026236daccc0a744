//! HTTP boundary
//!
//! - `GET /resolve-image?itemId=<id>` → `{"ogImage": string | null}`
//! - `GET /health` → `{"status": "ok"}`

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::error::ResolveError;
use crate::resolver::ImageResolver;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: ImageResolver,
}

impl AppState {
    pub fn new(resolver: ImageResolver) -> Self {
        Self { resolver }
    }
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/resolve-image", get(resolve_image_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ResolveImageQuery {
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveImageResponse {
    pub og_image: Option<String>,
}

/// Error answered to HTTP clients as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::ItemNotFound { .. } => ApiError::NotFound("Item not found"),
            ResolveError::Store(e) => {
                tracing::error!(error = %e, "item store failure");
                ApiError::Internal("Failed to load item".to_string())
            }
        }
    }
}

/// Parse the `itemId` query value as a base-10 integer.
pub fn parse_item_id(raw: Option<&str>) -> Result<i64, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::BadRequest("itemId is required"))?;
    raw.parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Invalid itemId"))
}

async fn resolve_image_handler(
    State(state): State<AppState>,
    Query(query): Query<ResolveImageQuery>,
) -> Result<Json<ResolveImageResponse>, ApiError> {
    let item_id = parse_item_id(query.item_id.as_deref())?;
    let og_image = state.resolver.resolve(item_id).await?;
    Ok(Json(ResolveImageResponse { og_image }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
