//! reqwest-backed implementation of [`OperationsBackend`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use caseops_core::bulk::BulkAction;
use caseops_core::config::ApiConfig;
use caseops_core::model::{CaseStatusResult, DailyReportResult, OperationResult};
use caseops_core::panel::{PanelKind, HEALTH_ENDPOINT, LETTER_EXCEL_ENDPOINT};

use crate::backend::{DownloadedFile, OperationsBackend};
use crate::error::{extract_server_message, BackendError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkRequestBody<'a> {
    document_numbers: &'a [String],
}

/// HTTP client for the case processing service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &ApiConfig) -> Result<Self, BackendError> {
        Self::new(&cfg.base_url, cfg.request_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and turn non-2xx statuses into [`BackendError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let server_message = extract_server_message(&body);
        debug!(status = status.as_u16(), ?server_message, "backend returned error status");
        Err(BackendError::Status {
            status: status.as_u16(),
            server_message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|err| BackendError::Decode {
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl OperationsBackend for HttpBackend {
    async fn process(&self, panel: PanelKind) -> Result<OperationResult, BackendError> {
        let Some(path) = panel.endpoint() else {
            return Err(BackendError::Transport {
                message: format!("{} has no trigger endpoint", panel.as_str()),
            });
        };
        debug!(panel = panel.as_str(), path, "POST");
        let response = self.send(self.client.post(self.url(path))).await?;
        let body = response.bytes().await?;
        OperationResult::decode(panel, &body).map_err(|err| BackendError::Decode {
            message: err.to_string(),
        })
    }

    async fn upload_daily_report(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<DailyReportResult, BackendError> {
        let path = PanelKind::DailyReport
            .endpoint()
            .unwrap_or("/api/daily-report/upload");
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        debug!(path, file_name, "POST multipart");
        let response = self
            .send(self.client.post(self.url(path)).multipart(form))
            .await?;
        Self::decode(response).await
    }

    async fn bulk_update(
        &self,
        action: BulkAction,
        document_numbers: &[String],
    ) -> Result<CaseStatusResult, BackendError> {
        let body = BulkRequestBody { document_numbers };
        debug!(
            action = action.id(),
            count = document_numbers.len(),
            "POST bulk"
        );
        let response = self
            .send(self.client.post(self.url(action.endpoint())).json(&body))
            .await?;
        Self::decode(response).await
    }

    async fn download_letter_excel(&self) -> Result<DownloadedFile, BackendError> {
        let response = self
            .send(self.client.get(self.url(LETTER_EXCEL_ENDPOINT)))
            .await?;
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?.to_vec();
        Ok(DownloadedFile {
            bytes,
            content_disposition,
        })
    }

    async fn health(&self) -> Result<String, BackendError> {
        let response = self.send(self.client.get(self.url(HEALTH_ENDPOINT))).await?;
        Ok(response.text().await?)
    }
}
