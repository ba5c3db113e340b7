use async_trait::async_trait;
use fornax_common::{
    error::{FornaxError, Result},
    types::{BatchAcknowledgment, ReportEntry, TransactionControl, TransactionStatusResponse},
};

use crate::progress::TransactionSource;

/// Typed client for the fornax HTTP API.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn submit_revalidation(&self, cnpjs: &[String]) -> Result<BatchAcknowledgment> {
        let response = self
            .client
            .put(self.url("/suppliers/revalidate"))
            .json(&serde_json::json!({ "cnpjs": cnpjs }))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    pub async fn submit_import(&self, cnpjs: &[String]) -> Result<BatchAcknowledgment> {
        let response = self
            .client
            .post(self.url("/imports"))
            .json(&serde_json::json!({ "cnpjs": cnpjs }))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    pub async fn transaction(&self, id: &str) -> Result<TransactionStatusResponse> {
        let response = self
            .client
            .get(self.url(&format!("/transactions/{id}")))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    pub async fn reports(&self) -> Result<Vec<ReportEntry>> {
        let response = self
            .client
            .get(self.url("/reports"))
            .send()
            .await
            .map_err(request_error)?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TransactionSource for ApiClient {
    async fn fetch(&self, id: &str) -> Result<TransactionControl> {
        Ok(self.transaction(id).await?.transaction_control)
    }
}

fn request_error(err: reqwest::Error) -> FornaxError {
    FornaxError::InternalError(format!("api request failed: {err}"))
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(FornaxError::InternalError(format!(
            "api returned status {status}"
        )));
    }
    response
        .json()
        .await
        .map_err(|err| FornaxError::InternalError(format!("malformed api response: {err}")))
}
