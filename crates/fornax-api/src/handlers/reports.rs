use std::sync::Arc;

use axum::{Json, extract::State};
use fornax_common::types::ReportEntry;

use crate::{ApiState, error::ApiError, types::CnpjListRequest};

pub async fn list_reports(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ReportEntry>>, ApiError> {
    Ok(Json(state.reports.list().await?))
}

/// Builds a report on the spot from companies already in the store. No
/// registry lookups, no transaction record; the file is cataloged and its
/// entry returned in the same request.
pub async fn generate_report(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CnpjListRequest>,
) -> Result<Json<ReportEntry>, ApiError> {
    let entry = state.runner.generate_report_from_store(&payload.cnpjs).await?;
    Ok(Json(entry))
}
