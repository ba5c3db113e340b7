use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use fornax_common::types::TransactionStatusResponse;

use crate::{ApiState, error::ApiError};

/// Authoritative read of one batch job's state. Reads are side-effect free:
/// polling a finished transaction returns the same frozen record every time.
pub async fn get_transaction(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<TransactionStatusResponse>, ApiError> {
    let record = state.transactions.get(&id).await?;
    let message = format!("update status: {}", record.status);
    Ok(Json(TransactionStatusResponse {
        transaction_control: record,
        message,
    }))
}
