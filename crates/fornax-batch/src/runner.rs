use std::{sync::Arc, time::Duration};

use fornax_common::{
    cnpj,
    error::{FornaxError, Result},
    time,
    types::{
        Company, CompanyActivity, CompanyPartner, ProcessType, RegistryRecord, ReportEntry,
        TransactionControl, TransactionStatus,
    },
};
use fornax_lookup::RegistryLookup;
use fornax_store::{
    CompanyStore, ReportCatalog, StoredCompany, TransactionStore, TransactionUpdate,
};
use tracing::{debug, info, warn};

use crate::{estimate, report::ReportGenerator};

/// Courtesy pause towards the external registry after every
/// [`RATE_LIMIT_EVERY`]th successful lookup. Unconditional, not configurable.
pub const RATE_LIMIT_PAUSE: Duration = Duration::from_millis(60_000);
pub const RATE_LIMIT_EVERY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// Refresh stored companies from the registry, one by one.
    Revalidate,
    /// Collect lookup rows and hand them to the report generator at the end.
    Report,
}

impl BatchKind {
    pub fn process_type(&self) -> ProcessType {
        match self {
            Self::Revalidate => ProcessType::RevalidateSupplier,
            Self::Report => ProcessType::GenerateReport,
        }
    }
}

/// Sequential, rate-limited batch executor. One runner serves every submitted
/// batch; each batch gets its own transaction record and detached task, and the
/// transaction store is the only coordination point between them.
#[derive(Clone)]
pub struct BatchRunner {
    lookup: Arc<dyn RegistryLookup>,
    transactions: TransactionStore,
    companies: CompanyStore,
    reports: ReportCatalog,
    generator: Arc<dyn ReportGenerator>,
}

impl BatchRunner {
    pub fn new(
        lookup: Arc<dyn RegistryLookup>,
        transactions: TransactionStore,
        companies: CompanyStore,
        reports: ReportCatalog,
        generator: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            lookup,
            transactions,
            companies,
            reports,
            generator,
        }
    }

    /// Creates the transaction record, stamps the duration estimate, and spawns
    /// the batch as a detached task. Returns before the first lookup happens;
    /// from here on the job is observable only through the transaction store.
    pub async fn submit(&self, kind: BatchKind, raw_cnpjs: Vec<String>) -> Result<TransactionControl> {
        let cnpjs: Vec<String> = raw_cnpjs
            .iter()
            .map(|raw| cnpj::normalize(raw))
            .filter(|digits| !digits.is_empty())
            .collect();
        if cnpjs.is_empty() {
            return Err(FornaxError::InvalidArgument(
                "batch submission requires at least one cnpj".to_string(),
            ));
        }

        let estimated_time_ms = match kind {
            BatchKind::Revalidate => estimate::revalidation_estimate_ms(cnpjs.len()),
            BatchKind::Report => estimate::report_estimate_ms(cnpjs.len()),
        };

        let record = self.transactions.create(kind.process_type()).await?;
        let record = self
            .transactions
            .update(&record.id, TransactionUpdate::estimate(estimated_time_ms))
            .await?;

        let runner = self.clone();
        let id = record.id.clone();
        info!(transaction = %id, items = cnpjs.len(), kind = ?kind, "batch submitted");
        tokio::spawn(async move {
            let _ = runner.execute(&id, kind, &cnpjs).await;
        });

        Ok(record)
    }

    /// Runs the batch to its terminal state. Any failure aborts the remaining
    /// items and marks the transaction CANCELLED.
    pub async fn execute(&self, id: &str, kind: BatchKind, cnpjs: &[String]) -> Result<()> {
        if let Err(err) = self.run_batch(id, kind, cnpjs).await {
            warn!(transaction = %id, error = %err, "batch aborted");
            self.mark_cancelled(id).await;
            return Err(err);
        }
        Ok(())
    }

    async fn run_batch(&self, id: &str, kind: BatchKind, cnpjs: &[String]) -> Result<()> {
        let mut consults: Vec<RegistryRecord> = Vec::with_capacity(cnpjs.len());

        for (index, cnpj) in cnpjs.iter().enumerate() {
            let record = self.lookup.lookup(cnpj).await?;

            match kind {
                BatchKind::Revalidate => self.persist_company(&record).await?,
                BatchKind::Report => consults.push(record),
            }

            self.transactions
                .update(id, TransactionUpdate::checkpoint())
                .await?;
            debug!(transaction = %id, position = index + 1, cnpj = %cnpj, "batch item processed");

            if (index + 1) % RATE_LIMIT_EVERY == 0 {
                debug!(transaction = %id, "pausing before the next lookup window");
                tokio::time::sleep(RATE_LIMIT_PAUSE).await;
            }
        }

        if kind == BatchKind::Report {
            let (companies, activities, partners) = build_report_rows(&consults);
            let file_name = self
                .generator
                .generate(&companies, &activities, &partners)
                .await?;
            self.reports.add(&file_name).await?;
            info!(transaction = %id, file = %file_name, "report artifact cataloged");
        }

        self.transactions
            .update(id, TransactionUpdate::terminal(TransactionStatus::Done))
            .await?;
        info!(transaction = %id, items = cnpjs.len(), "batch completed");
        Ok(())
    }

    /// Generates a report right away from already-stored companies, without
    /// touching the external registry. No transaction record is involved;
    /// unknown CNPJs are skipped and at least one must resolve.
    pub async fn generate_report_from_store(&self, raw_cnpjs: &[String]) -> Result<ReportEntry> {
        let stored = self.companies.list_by_cnpjs(raw_cnpjs).await?;
        if stored.is_empty() {
            return Err(FornaxError::CompanyNotFound(
                "no stored supplier matches the given cnpjs".to_string(),
            ));
        }

        let mut companies = Vec::with_capacity(stored.len());
        let mut activities = Vec::new();
        let mut partners = Vec::new();
        for item in stored {
            companies.push(item.company);
            activities.extend(item.activities);
            partners.extend(item.partners);
        }

        let file_name = self
            .generator
            .generate(&companies, &activities, &partners)
            .await?;
        let entry = self.reports.add(&file_name).await?;
        info!(file = %file_name, companies = companies.len(), "on-demand report cataloged");
        Ok(entry)
    }

    async fn persist_company(&self, record: &RegistryRecord) -> Result<()> {
        let stored = StoredCompany::from_registry(record, time::now());
        self.companies.save(&stored).await
    }

    async fn mark_cancelled(&self, id: &str) {
        if let Err(err) = self
            .transactions
            .update(id, TransactionUpdate::terminal(TransactionStatus::Cancelled))
            .await
        {
            warn!(transaction = %id, error = %err, "failed to mark batch cancelled");
        }
    }
}

fn build_report_rows(
    consults: &[RegistryRecord],
) -> (Vec<Company>, Vec<CompanyActivity>, Vec<CompanyPartner>) {
    let now = time::now();
    let mut companies = Vec::with_capacity(consults.len());
    let mut activities = Vec::new();
    let mut partners = Vec::new();

    for record in consults {
        companies.push(Company::from_registry(record, now));
        activities.extend(CompanyActivity::from_registry(record));
        partners.extend(CompanyPartner::from_registry(record));
    }

    (companies, activities, partners)
}
