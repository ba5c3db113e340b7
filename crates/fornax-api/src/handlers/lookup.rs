use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use fornax_common::{cnpj, types::RegistryRecord};

use crate::{ApiState, error::ApiError};

/// Direct single-CNPJ proxy lookup against the external registry. Nothing is
/// persisted.
pub async fn consult_cnpj(
    State(state): State<Arc<ApiState>>,
    Path(raw_cnpj): Path<String>,
) -> Result<Json<RegistryRecord>, ApiError> {
    let digits = cnpj::validate(&raw_cnpj)?;
    Ok(Json(state.lookup.lookup(&digits).await?))
}
