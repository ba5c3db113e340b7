use async_trait::async_trait;
use fornax_common::{
    RegistryRecord,
    error::{FornaxError, Result},
};
use tracing::debug;

pub const DEFAULT_REGISTRY_URL: &str = "https://receitaws.com.br/v1/cnpj";

/// One lookup per CNPJ against the external registry. No retries; failures
/// surface raw and the caller decides what to do with them.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, cnpj: &str) -> Result<RegistryRecord>;
}

pub struct HttpRegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RegistryLookup for HttpRegistryClient {
    // No request timeout is configured: a hung registry call stalls the whole
    // batch. Inherited behavior, kept on purpose.
    async fn lookup(&self, cnpj: &str) -> Result<RegistryRecord> {
        let url = format!("{}/{cnpj}", self.base_url.trim_end_matches('/'));
        debug!(cnpj = %cnpj, "looking up cnpj in external registry");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FornaxError::Lookup {
                cnpj: cnpj.to_string(),
                reason: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FornaxError::Lookup {
                cnpj: cnpj.to_string(),
                reason: format!("registry returned status {}", response.status()),
            });
        }

        let record: RegistryRecord =
            response.json().await.map_err(|err| FornaxError::Lookup {
                cnpj: cnpj.to_string(),
                reason: format!("malformed registry response: {err}"),
            })?;

        // The registry answers 200 with an empty body shape for unknown CNPJs;
        // a record without a cnpj field is unusable.
        if record.cnpj.is_empty() {
            return Err(FornaxError::Lookup {
                cnpj: cnpj.to_string(),
                reason: "registry returned no record".to_string(),
            });
        }

        Ok(record)
    }
}
