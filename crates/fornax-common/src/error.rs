use thiserror::Error;

#[derive(Debug, Error)]
pub enum FornaxError {
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("company not found: {0}")]
    CompanyNotFound(String),
    #[error("invalid cnpj: {0}")]
    InvalidCnpj(String),
    #[error("registry lookup failed for {cnpj}: {reason}")]
    Lookup { cnpj: String, reason: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal error: {0}")]
    InternalError(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FornaxError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionNotFound(_) => "TransactionNotFound",
            Self::CompanyNotFound(_) => "CompanyNotFound",
            Self::InvalidCnpj(_) => "InvalidCnpj",
            Self::Lookup { .. } => "LookupFailure",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::InternalError(_) => "InternalError",
            Self::Io(_) => "InternalError",
        }
    }
}

pub type Result<T> = std::result::Result<T, FornaxError>;
