use std::path::{Path, PathBuf};

use fornax_common::{
    cnpj,
    error::{FornaxError, Result},
    types::{Company, CompanyActivity, CompanyPartner},
};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// A company together with its activity and partner lists. Saving replaces the
/// lists wholesale, mirroring the revalidation flow which rebuilds both from
/// the fresh registry record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCompany {
    pub company: Company,
    pub activities: Vec<CompanyActivity>,
    pub partners: Vec<CompanyPartner>,
}

impl StoredCompany {
    pub fn from_registry(
        record: &fornax_common::types::RegistryRecord,
        refreshed_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            company: Company::from_registry(record, refreshed_at),
            activities: CompanyActivity::from_registry(record),
            partners: CompanyPartner::from_registry(record),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompanyStore {
    dir: PathBuf,
}

impl CompanyStore {
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref().join(".companies");
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub async fn save(&self, stored: &StoredCompany) -> Result<()> {
        let path = self.company_path(&stored.company.cnpj);
        let data = serde_json::to_vec_pretty(stored).map_err(|err| {
            FornaxError::InternalError(format!(
                "failed to serialize company {}: {err}",
                stored.company.cnpj
            ))
        })?;
        fs::write(path, data).await?;
        Ok(())
    }

    pub async fn get(&self, raw_cnpj: &str) -> Result<StoredCompany> {
        let digits = cnpj::normalize(raw_cnpj);
        match fs::read(self.company_path(&digits)).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                FornaxError::InternalError(format!("failed to parse company {digits}: {err}"))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FornaxError::CompanyNotFound(raw_cnpj.to_string()))
            }
            Err(err) => Err(FornaxError::Io(err)),
        }
    }

    pub async fn delete(&self, raw_cnpj: &str) -> Result<()> {
        let digits = cnpj::normalize(raw_cnpj);
        match fs::remove_file(self.company_path(&digits)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FornaxError::CompanyNotFound(raw_cnpj.to_string()))
            }
            Err(err) => Err(FornaxError::Io(err)),
        }
    }

    pub async fn list(&self) -> Result<Vec<StoredCompany>> {
        let mut companies = Vec::new();
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
            let stored = serde_json::from_slice::<StoredCompany>(&bytes).map_err(|err| {
                FornaxError::InternalError(format!("failed to parse {:?}: {err}", path))
            })?;
            companies.push(stored);
        }

        companies.sort_by(|left, right| left.company.nome.cmp(&right.company.nome));
        Ok(companies)
    }

    /// Resolves the subset of `raw_cnpjs` that exist in the store, in stored
    /// (name) order. Unknown CNPJs are silently skipped.
    pub async fn list_by_cnpjs(&self, raw_cnpjs: &[String]) -> Result<Vec<StoredCompany>> {
        let wanted: Vec<String> = raw_cnpjs.iter().map(|raw| cnpj::normalize(raw)).collect();
        let companies = self.list().await?;
        Ok(companies
            .into_iter()
            .filter(|stored| wanted.iter().any(|cnpj| *cnpj == stored.company.cnpj))
            .collect())
    }

    fn company_path(&self, digits: &str) -> PathBuf {
        self.dir.join(format!("{digits}.json"))
    }
}

#[cfg(test)]
mod tests {
    use fornax_common::{
        time,
        types::{Company, RegistryRecord},
    };
    use uuid::Uuid;

    use super::{CompanyStore, StoredCompany};

    fn stored(cnpj: &str, nome: &str) -> StoredCompany {
        let record = RegistryRecord {
            cnpj: cnpj.to_string(),
            nome: nome.to_string(),
            ..RegistryRecord::default()
        };
        StoredCompany {
            company: Company::from_registry(&record, time::now()),
            activities: Vec::new(),
            partners: Vec::new(),
        }
    }

    async fn temp_store() -> CompanyStore {
        let dir = std::env::temp_dir().join(format!("fornax-companies-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        CompanyStore::new(&dir).await.unwrap()
    }

    #[tokio::test]
    async fn save_then_get_accepts_formatted_cnpj() {
        let store = temp_store().await;
        store.save(&stored("12345678000195", "Acme")).await.unwrap();

        let found = store.get("12.345.678/0001-95").await.unwrap();
        assert_eq!(found.company.nome, "Acme");
    }

    #[tokio::test]
    async fn list_sorts_by_name() {
        let store = temp_store().await;
        store.save(&stored("11111111000111", "Zeta")).await.unwrap();
        store.save(&stored("22222222000122", "Alpha")).await.unwrap();

        let companies = store.list().await.unwrap();
        let names: Vec<&str> = companies
            .iter()
            .map(|stored| stored.company.nome.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn list_by_cnpjs_skips_unknown() {
        let store = temp_store().await;
        store.save(&stored("11111111000111", "Zeta")).await.unwrap();

        let found = store
            .list_by_cnpjs(&[
                "11.111.111/0001-11".to_string(),
                "99999999000199".to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company.cnpj, "11111111000111");
    }

    #[tokio::test]
    async fn delete_missing_company_fails() {
        let store = temp_store().await;
        assert!(store.delete("12345678000195").await.is_err());
    }
}
