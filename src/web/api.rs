//! `/api/history` endpoints.

use super::AppState;
use super::error::ApiError;
use crate::models::history::{Acknowledgement, CreateHistoryRequest, HistoryRecord};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub tag: Option<String>,
}

/// GET /api/history
pub async fn get_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    Ok(Json(state.history.list().await?))
}

/// POST /api/history
pub async fn add_history_entry(
    State(state): State<AppState>,
    body: Result<Json<CreateHistoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<HistoryRecord>), ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!(error = %rejection, "rejected history body");
        ApiError::bad_request("Invalid JSON body")
    })?;

    let record = state.history.create(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/history
pub async fn delete_all_history(
    State(state): State<AppState>,
) -> Result<Json<Acknowledgement>, ApiError> {
    Ok(Json(state.history.delete_all().await?))
}

/// DELETE /api/history/{id}
///
/// Only unsigned decimal ids route here; `-1`, `+5` or `abc` are a 404 like
/// an unknown path.
pub async fn delete_history_entry(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Acknowledgement>, ApiError> {
    let id = parse_entry_id(&raw_id).ok_or_else(ApiError::not_found)?;
    Ok(Json(state.history.delete_one(id).await?))
}

fn parse_entry_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// GET /api/history/filter?tag=
pub async fn filter_history(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    Ok(Json(state.history.filter(params.tag.as_deref()).await?))
}
