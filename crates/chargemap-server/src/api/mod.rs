mod stations;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chargemap_core::{AppConfig, QueryError, StationStore, StoreError, DEFAULT_MAX_PAGE_SIZE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct AppState<S> {
    pub store: Arc<S>,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

// Manual impl: `S` itself does not need to be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

impl<S> AppState<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_paging(mut self, config: &AppConfig) -> Self {
        self.default_page_size = config.query_default_page_size;
        self.max_page_size = config.query_max_page_size;
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Turn a query failure into the API error envelope.
///
/// Bad paging input is the caller's fault; store throttling is surfaced as
/// `rate_limited`; anything else is logged and hidden behind `internal_error`.
pub(super) fn map_query_error(request_id: String, error: &QueryError) -> ApiError {
    match error {
        e if e.is_invalid_input() => ApiError::new(request_id, "validation_error", e.to_string()),
        QueryError::Store(StoreError::RateLimited { .. }) => {
            tracing::warn!(error = %error, "store is rate limiting queries");
            ApiError::new(request_id, "rate_limited", "store is busy, retry later")
        }
        e => {
            tracing::error!(error = %e, "station query failed");
            ApiError::new(request_id, "internal_error", "station query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn station_router<S>(rate_limit: RateLimitState) -> Router<AppState<S>>
where
    S: StationStore + 'static,
{
    Router::new()
        .route("/api/v1/stations", get(stations::list_positions::<S>))
        .route(
            "/api/v1/stations/search",
            get(stations::search_by_postal_code::<S>),
        )
        .route("/api/v1/stations/{id}", get(stations::get_station::<S>))
        .route(
            "/api/v1/partitions/{partition_key}/stations",
            get(stations::list_partition::<S>),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app<S>(state: AppState<S>, rate_limit: RateLimitState) -> Router
where
    S: StationStore + 'static,
{
    let public_routes = Router::new().route("/api/v1/health", get(health::<S>));

    Router::new()
        .merge(public_routes)
        .merge(station_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<S: StationStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    store: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
