use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::{multipart, Client, StatusCode};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::Document;

const HEALTH_PATH: &str = "/health";
const CONVERT_PATH: &str = "/forms/libreoffice/convert";
const MERGE_PATH: &str = "/forms/pdfengines/merge";

/// HTTP client for the external document converter.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ConverterClient {
    client: Client,
    base_url: String,
}

impl ConverterClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build converter client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Liveness probe against the converter's `/health`.
    pub async fn health_check(&self) -> AppResult<()> {
        let url = self.url(HEALTH_PATH);
        debug!(url = %url, "Checking converter health");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Converter health check request failed");
            AppError::service_unavailable(format!("converter at {}: {}", self.base_url, e))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "Converter health check did not return 200");
            return Err(AppError::service_unavailable(format!(
                "converter at {} returned {}",
                self.base_url, status
            )));
        }

        Ok(())
    }

    /// Converts one Office document to PDF, returning the PDF bytes.
    pub async fn convert(&self, document: &Document) -> AppResult<Bytes> {
        let start = Instant::now();
        let url = self.url(CONVERT_PATH);

        info!(
            file_name = %document.name,
            file_size = document.size(),
            "Converting document to PDF"
        );

        let part = multipart::Part::stream_with_length(document.data.clone(), document.size() as u64)
            .file_name(document.name.clone());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(file_name = %document.name, error = %e, "Convert request failed");
                AppError::conversion(&document.name, e.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!(file_name = %document.name, error = %e, "Failed to read convert response");
            AppError::conversion(&document.name, e.to_string())
        })?;

        if status != StatusCode::OK {
            error!(file_name = %document.name, status = %status, "Converter rejected document");
            return Err(AppError::conversion(
                &document.name,
                remote_detail(status, &body),
            ));
        }

        info!(
            file_name = %document.name,
            pdf_size = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Document converted"
        );

        Ok(body)
    }

    /// Merges PDFs in slice order into a single PDF.
    ///
    /// Each document is attached as `file{index}` under its current name; the
    /// converter orders pages by attachment name.
    pub async fn merge(&self, documents: &[Document]) -> AppResult<Bytes> {
        let start = Instant::now();
        let url = self.url(MERGE_PATH);

        let mut form = multipart::Form::new();
        for (index, document) in documents.iter().enumerate() {
            let part = multipart::Part::stream_with_length(document.data.clone(), document.size() as u64)
                .file_name(document.name.clone())
                .mime_str("application/pdf")
                .map_err(|e| AppError::merge(e.to_string()))?;
            form = form.part(format!("file{}", index), part);
        }

        info!(documents = documents.len(), "Merging documents");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Merge request failed");
                AppError::merge(e.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!(error = %e, "Failed to read merge response");
            AppError::merge(e.to_string())
        })?;

        if status != StatusCode::OK {
            error!(status = %status, "Converter rejected merge");
            return Err(AppError::merge(remote_detail(status, &body)));
        }

        info!(
            merged_size = body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Documents merged"
        );

        Ok(body)
    }
}

/// Remote error body as text, or the status when the body is empty.
fn remote_detail(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_string()
    }
}
