mod report;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use fornax_api::{ApiState, api_router};
use fornax_batch::{BatchRunner, ReportGenerator};
use fornax_lookup::{DEFAULT_REGISTRY_URL, HttpRegistryClient, RegistryLookup};
use fornax_store::{CompanyStore, ReportCatalog, TransactionStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::FileReportGenerator;

#[derive(Parser)]
#[command(name = "fornax", about = "Supplier registry back-office server")]
struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(long, default_value = "8080")]
    port: u16,

    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Base URL of the external CNPJ registry service.
    #[arg(long)]
    registry_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::from_default_env().add_directive("fornax=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    let data_dir = PathBuf::from(&cli.data_dir);
    tokio::fs::create_dir_all(&data_dir).await?;

    let registry_url = cli
        .registry_url
        .or_else(|| std::env::var("FORNAX_REGISTRY_URL").ok())
        .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());
    let lookup: Arc<dyn RegistryLookup> = Arc::new(HttpRegistryClient::new(registry_url.clone()));
    info!(registry = %registry_url, "external registry lookup configured");

    let transactions = TransactionStore::new(&data_dir).await?;
    let companies = CompanyStore::new(&data_dir).await?;
    let reports = ReportCatalog::new(&data_dir).await?;
    let generator: Arc<dyn ReportGenerator> = Arc::new(FileReportGenerator::new(&data_dir).await?);

    let runner = BatchRunner::new(
        Arc::clone(&lookup),
        transactions.clone(),
        companies.clone(),
        reports.clone(),
        generator,
    );

    let state = Arc::new(ApiState {
        runner,
        lookup,
        transactions,
        companies,
        reports,
    });
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("fornax server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
