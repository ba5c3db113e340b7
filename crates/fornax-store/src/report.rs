use std::path::{Path, PathBuf};

use fornax_common::{
    error::{FornaxError, Result},
    time,
    types::ReportEntry,
};
use tokio::fs;
use uuid::Uuid;

/// Catalog of generated report artifacts. The artifact files themselves belong
/// to the report generator; this store only remembers their names.
#[derive(Debug, Clone)]
pub struct ReportCatalog {
    dir: PathBuf,
}

impl ReportCatalog {
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref().join(".reports");
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub async fn add(&self, file_name: impl Into<String>) -> Result<ReportEntry> {
        let entry = ReportEntry {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            created_at: time::now(),
        };
        let data = serde_json::to_vec_pretty(&entry).map_err(|err| {
            FornaxError::InternalError(format!(
                "failed to serialize report entry {}: {err}",
                entry.id
            ))
        })?;
        fs::write(self.dir.join(format!("{}.json", entry.id)), data).await?;
        Ok(entry)
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<ReportEntry>> {
        let mut reports = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                continue;
            }

            let bytes = fs::read(&path).await?;
            let report = serde_json::from_slice::<ReportEntry>(&bytes).map_err(|err| {
                FornaxError::InternalError(format!("failed to parse {:?}: {err}", path))
            })?;
            reports.push(report);
        }

        reports.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::ReportCatalog;

    #[tokio::test]
    async fn add_then_list_newest_first() {
        let dir = std::env::temp_dir().join(format!("fornax-reports-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let catalog = ReportCatalog::new(&dir).await.unwrap();

        catalog.add("relatorio-1.xlsx").await.unwrap();
        catalog.add("relatorio-2.xlsx").await.unwrap();

        let reports = catalog.list().await.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].created_at >= reports[1].created_at);
    }
}
