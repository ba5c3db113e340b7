pub mod estimate;
pub mod report;
pub mod runner;

pub use report::ReportGenerator;
pub use runner::{BatchKind, BatchRunner, RATE_LIMIT_EVERY, RATE_LIMIT_PAUSE};
