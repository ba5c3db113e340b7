use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use fornax_batch::BatchRunner;
use fornax_lookup::RegistryLookup;
use fornax_store::{CompanyStore, ReportCatalog, TransactionStore};

use crate::handlers;

pub struct ApiState {
    pub runner: BatchRunner,
    pub lookup: Arc<dyn RegistryLookup>,
    pub transactions: TransactionStore,
    pub companies: CompanyStore,
    pub reports: ReportCatalog,
}

pub fn api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/imports", post(handlers::imports::submit_import))
        .route("/imports/file", post(handlers::imports::submit_import_file))
        .route(
            "/suppliers",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/suppliers/revalidate",
            put(handlers::suppliers::revalidate_suppliers),
        )
        .route(
            "/suppliers/{cnpj}",
            get(handlers::suppliers::get_supplier).delete(handlers::suppliers::delete_supplier),
        )
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
        .route("/lookup/{cnpj}", get(handlers::lookup::consult_cnpj))
        .route(
            "/reports",
            get(handlers::reports::list_reports).post(handlers::reports::generate_report),
        )
        .with_state(state)
}
