use axum::{Json, response::IntoResponse};
use fornax_common::error::FornaxError;
use http::StatusCode;

pub struct ApiError(pub FornaxError);

impl From<FornaxError> for ApiError {
    fn from(value: FornaxError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            FornaxError::TransactionNotFound(_) | FornaxError::CompanyNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            FornaxError::InvalidArgument(_) | FornaxError::InvalidCnpj(_) => {
                StatusCode::BAD_REQUEST
            }
            FornaxError::Lookup { .. } => StatusCode::BAD_GATEWAY,
            FornaxError::InternalError(_) | FornaxError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(serde_json::json!({
                "code": self.0.error_code(),
                "message": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
