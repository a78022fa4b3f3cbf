/*!
 * HTTP client for the remote document-translation service.
 *
 * Implements [`TranslationApi`] against the service's REST surface:
 * multipart document submission, per-job status queries, artifact
 * download, and the engine / language-direction listings.
 */

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::errors::ServiceError;
use crate::service::{Engine, LanguageDirection, TranslationApi};
use crate::workflow::job::{DocumentStatus, JobHandle};

/// Default public endpoint of the translation service
const DEFAULT_ENDPOINT: &str = "https://api.translate.example.com";

/// reqwest-backed client for the translation service
#[derive(Debug)]
pub struct HttpTranslationApi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Service base URL
    base_url: Url,
}

/// Submission acknowledgement body
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    /// Service-assigned job identifier
    id: String,
}

impl HttpTranslationApi {
    /// Create a new client against the given endpoint.
    ///
    /// An empty endpoint falls back to the public service URL.
    pub fn new(api_key: impl Into<String>, endpoint: &str, timeout_secs: u64) -> Result<Self, ServiceError> {
        let raw = if endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            endpoint
        };
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ServiceError::Transport(format!("Invalid endpoint {}: {}", raw, e)))?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url,
        })
    }

    /// Build a full URL for an API path
    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Map a non-success response to a typed service error
    async fn error_from_response(response: reqwest::Response) -> ServiceError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Translation API error ({}): {}", status, body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(body),
            StatusCode::NOT_FOUND => ServiceError::JobNotFound(body),
            _ => ServiceError::Api {
                status_code: status.as_u16(),
                message: body,
            },
        }
    }

    /// Issue an authenticated GET and return the raw response
    async fn get(&self, path: &str) -> Result<reqwest::Response, ServiceError> {
        self.client
            .get(self.api_url(path))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))
    }
}

#[async_trait]
impl TranslationApi for HttpTranslationApi {
    async fn submit_document(
        &self,
        content: Bytes,
        filename: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<JobHandle, ServiceError> {
        let file_part = Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("target_lang", target.to_string());
        if let Some(source_lang) = source {
            form = form.text("source_lang", source_lang.to_string());
        }

        let response = self
            .client
            .post(self.api_url("documents"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let accepted = response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))?;
        debug!("Submitted {} as job {}", filename, accepted.id);

        Ok(JobHandle::new(accepted.id))
    }

    async fn job_status(&self, handle: &JobHandle) -> Result<DocumentStatus, ServiceError> {
        let response = self.get(&format!("documents/{}", handle.id())).await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<DocumentStatus>()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))
    }

    async fn fetch_result(&self, handle: &JobHandle) -> Result<Bytes, ServiceError> {
        let response = self.get(&format!("documents/{}/result", handle.id())).await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))
    }

    async fn list_engines(&self) -> Result<Vec<Engine>, ServiceError> {
        let response = self.get("engines").await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<Vec<Engine>>()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))
    }

    async fn list_language_directions(&self) -> Result<Vec<LanguageDirection>, ServiceError> {
        let response = self.get("language-directions").await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json::<Vec<LanguageDirection>>()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))
    }
}
