use std::sync::Arc;

use axum::{Json, extract::State};
use fornax_batch::BatchKind;
use fornax_common::types::BatchAcknowledgment;

use crate::{ApiState, error::ApiError, types::CnpjListRequest};

/// Submits a report-generation batch for a list of CNPJs. The response is sent
/// before any lookup happens; callers watch the transaction for completion.
pub async fn submit_import(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CnpjListRequest>,
) -> Result<Json<BatchAcknowledgment>, ApiError> {
    submit(state, payload.cnpjs).await
}

/// Same batch as [`submit_import`], fed from an uploaded delimiter-separated
/// file: one CNPJ per line, first field wins.
pub async fn submit_import_file(
    State(state): State<Arc<ApiState>>,
    body: String,
) -> Result<Json<BatchAcknowledgment>, ApiError> {
    submit(state, parse_identifier_lines(&body)).await
}

async fn submit(
    state: Arc<ApiState>,
    cnpjs: Vec<String>,
) -> Result<Json<BatchAcknowledgment>, ApiError> {
    let count = cnpjs.len();
    let record = state.runner.submit(BatchKind::Report, cnpjs).await?;
    Ok(Json(BatchAcknowledgment {
        transaction_control: record,
        message: format!("{count} CNPJs are being processed, please wait"),
    }))
}

fn parse_identifier_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.split(';').next().unwrap_or(line).trim().to_string())
        .filter(|field| !field.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_identifier_lines;

    #[test]
    fn takes_the_first_field_of_each_line() {
        let body = "12345678000195;Acme\n\n98765432000109\n;\n";
        assert_eq!(
            parse_identifier_lines(body),
            vec!["12345678000195".to_string(), "98765432000109".to_string()]
        );
    }
}
