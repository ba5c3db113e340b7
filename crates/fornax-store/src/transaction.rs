use std::path::{Path, PathBuf};

use fornax_common::{
    error::{FornaxError, Result},
    time,
    types::{ProcessType, TransactionControl, TransactionStatus},
};
use tokio::fs;
use uuid::Uuid;

/// Partial update applied to a transaction record. `updated_at` is refreshed on
/// every write regardless of which fields are present.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub status: Option<TransactionStatus>,
    pub estimated_time_ms: Option<i64>,
    pub set_completed_at: bool,
}

impl TransactionUpdate {
    /// Heartbeat write after a successfully processed batch item.
    pub fn checkpoint() -> Self {
        Self {
            status: Some(TransactionStatus::Updating),
            ..Self::default()
        }
    }

    /// Terminal write: DONE or CANCELLED, stamping `completed_at`.
    pub fn terminal(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
            set_completed_at: true,
            ..Self::default()
        }
    }

    pub fn estimate(estimated_time_ms: i64) -> Self {
        Self {
            status: Some(TransactionStatus::Updating),
            estimated_time_ms: Some(estimated_time_ms),
            ..Self::default()
        }
    }
}

/// Durable store of transaction control records, one JSON file per id.
/// Last-writer-wins per record; records for different ids never contend.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    dir: PathBuf,
}

impl TransactionStore {
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref().join(".transactions");
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub async fn create(&self, process_type: ProcessType) -> Result<TransactionControl> {
        let now = time::now();
        let record = TransactionControl {
            id: Uuid::new_v4().to_string(),
            process_type,
            status: TransactionStatus::Updating,
            estimated_time_ms: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.write_record(&record).await?;
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<TransactionControl> {
        match fs::read(self.record_path(id)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                FornaxError::InternalError(format!("failed to parse transaction {id}: {err}"))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FornaxError::TransactionNotFound(id.to_string()))
            }
            Err(err) => Err(FornaxError::Io(err)),
        }
    }

    pub async fn update(&self, id: &str, update: TransactionUpdate) -> Result<TransactionControl> {
        let mut record = self.get(id).await?;

        // Exactly one terminal transition per job: once DONE or CANCELLED the
        // record is frozen.
        if record.status.is_terminal() {
            return Err(FornaxError::InvalidArgument(format!(
                "transaction {id} already reached terminal status {}",
                record.status
            )));
        }

        if let Some(status) = update.status {
            record.status = status;
        }
        if let Some(estimated_time_ms) = update.estimated_time_ms {
            record.estimated_time_ms = estimated_time_ms;
        }
        record.updated_at = time::now();
        if update.set_completed_at {
            record.completed_at = Some(record.updated_at);
        }

        self.write_record(&record).await?;
        Ok(record)
    }

    async fn write_record(&self, record: &TransactionControl) -> Result<()> {
        let data = serde_json::to_vec_pretty(record).map_err(|err| {
            FornaxError::InternalError(format!(
                "failed to serialize transaction {}: {err}",
                record.id
            ))
        })?;
        fs::write(self.record_path(&record.id), data).await?;
        Ok(())
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}
