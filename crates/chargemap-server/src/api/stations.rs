use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chargemap_core::{
    query_by_id, query_by_partition, query_by_postal_code, query_positions, PageRequest,
    PaginatedResult, Station, StationPosition, StationStore, StationSummary,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_query_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Default, Deserialize)]
pub(super) struct PageParams {
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    #[serde(alias = "postalCode")]
    pub postal_code: Option<String>,
    pub page: Option<i64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<i64>,
}

fn page_request<S>(
    state: &AppState<S>,
    req_id: &RequestId,
    page: Option<i64>,
    page_size: Option<i64>,
) -> Result<PageRequest, ApiError> {
    PageRequest::new(
        page.unwrap_or(1),
        page_size.unwrap_or_else(|| i64::from(state.default_page_size)),
        state.max_page_size,
    )
    .map_err(|e| map_query_error(req_id.0.clone(), &e))
}

fn query_rejection(req_id: &RequestId, rejection: &QueryRejection) -> ApiError {
    ApiError::new(
        req_id.0.clone(),
        "validation_error",
        rejection.body_text(),
    )
}

pub(super) async fn list_positions<S: StationStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<StationPosition>>>, ApiError> {
    let data = query_positions(state.store.as_ref())
        .await
        .map_err(|e| map_query_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_by_postal_code<S: StationStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedResult<StationSummary>>>, ApiError> {
    let Query(params) = params.map_err(|e| query_rejection(&req_id, &e))?;
    let postal_code = params
        .postal_code
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                "postal_code is required",
            )
        })?;
    let request = page_request(&state, &req_id, params.page, params.page_size)?;

    let data = query_by_postal_code(state.store.as_ref(), &postal_code, request)
        .await
        .map_err(|e| map_query_error(req_id.0.clone(), &e))?
        .map(StationSummary::from);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_partition<S: StationStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(partition_key): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedResult<Station>>>, ApiError> {
    let Query(params) = params.map_err(|e| query_rejection(&req_id, &e))?;
    let request = page_request(&state, &req_id, params.page, params.page_size)?;

    let data = query_by_partition(state.store.as_ref(), &partition_key, request)
        .await
        .map_err(|e| map_query_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_station<S: StationStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StationSummary>>, ApiError> {
    let station = query_by_id(state.store.as_ref(), &id)
        .await
        .map_err(|e| map_query_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("station {id} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: StationSummary::from(station),
        meta: ResponseMeta::new(req_id.0),
    }))
}
