pub mod imports;
pub mod lookup;
pub mod reports;
pub mod suppliers;
pub mod transactions;
