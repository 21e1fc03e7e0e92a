use axum::{
    body::Bytes,
    extract::{Path, State},
};
use service::status::{SetOutcome, StatusQuery, StatusRecord};
use tracing::info;

use crate::errors::ApiError;
use crate::observability::{GET_MISS_TOTAL, GET_TOTAL, SET_REJECTED_TOTAL, SET_TOTAL};
use crate::routes::AppState;

/// `POST /:timeseries_id` — record that the request in the body produced
/// `timeseries_id`.
pub async fn set_status(
    State(state): State<AppState>,
    Path(timeseries_id): Path<String>,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let record: StatusRecord =
        serde_json::from_slice(&body).map_err(|e| ApiError::Validation(e.to_string()))?;
    info!(%timeseries_id, service = %record.service, value_type = %record.value_type, request_id = %record.request_id, "set status");

    match state.status.record(&record, &timeseries_id).await? {
        SetOutcome::Stored => {
            SET_TOTAL.inc();
            Ok("OK")
        }
        SetOutcome::Rejected => {
            SET_REJECTED_TOTAL.inc();
            Err(ApiError::WriteRejected { request_id: record.request_id })
        }
    }
}

pub async fn get_import_status(
    State(state): State<AppState>,
    Path((value_type, request_id)): Path<(String, String)>,
) -> Result<String, ApiError> {
    lookup(&state, StatusQuery::import(value_type, request_id)).await
}

pub async fn get_export_status(
    State(state): State<AppState>,
    Path((value_type, request_id)): Path<(String, String)>,
) -> Result<String, ApiError> {
    lookup(&state, StatusQuery::export(value_type, request_id)).await
}

pub async fn get_extension_status(
    State(state): State<AppState>,
    Path((extension, extension_function, request_id)): Path<(String, String, String)>,
) -> Result<String, ApiError> {
    lookup(&state, StatusQuery::extension(extension, extension_function, request_id)).await
}

async fn lookup(state: &AppState, query: StatusQuery) -> Result<String, ApiError> {
    GET_TOTAL.inc();
    info!(service = %query.service, value_type = %query.value_type, request_id = %query.request_id, qualifier = ?query.qualifier, "get status");
    match state.status.lookup(&query).await? {
        Some(timeseries_id) if !timeseries_id.is_empty() => Ok(timeseries_id),
        // an empty stored value counts as not recorded
        _ => {
            GET_MISS_TOTAL.inc();
            Err(ApiError::NotFound { request_id: query.request_id })
        }
    }
}
