pub mod cnpj;
pub mod error;
pub mod time;
pub mod types;

pub use error::{FornaxError, Result};
pub use types::{
    ActivityType, BatchAcknowledgment, Company, CompanyActivity, CompanyPartner, ProcessType,
    RegistryActivity, RegistryPartner, RegistryRecord, ReportEntry, TransactionControl,
    TransactionStatus, TransactionStatusResponse,
};
