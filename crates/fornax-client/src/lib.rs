pub mod api;
pub mod progress;

pub use api::ApiClient;
pub use progress::{ProgressEstimator, StatusEvent, TransactionSource};
