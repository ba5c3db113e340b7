pub mod company;
pub mod report;
pub mod transaction;

pub use company::{CompanyStore, StoredCompany};
pub use report::ReportCatalog;
pub use transaction::{TransactionStore, TransactionUpdate};
