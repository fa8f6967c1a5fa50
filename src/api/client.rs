// src/api/client.rs
//! HTTP transport for the open platform.
//!
//! A thin wrapper around reqwest that turns an `ApiRequest` into a wire
//! request and hands back the raw body with its metadata. It does no
//! envelope parsing and no retries.

use super::types::{ApiRequest, ApiResponse, HttpMethod, RequestBody, RequestTarget};
use super::FeishuTransport;
use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, FEISHU_API_BASE_URL, FEISHU_LOG_ID_HEADER};
use crate::error::AppError;
use crate::types::ValidatedUrl;
use reqwest::{header, multipart, Client, Response};
use std::time::Duration;

/// Connection settings for `FeishuHttpClient`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: ValidatedUrl,
    pub timeout: Duration,
}

impl ClientSettings {
    pub fn new(base_url: ValidatedUrl, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: ValidatedUrl::parse(FEISHU_API_BASE_URL)
                .expect("Default base URL should be valid"),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// A thin wrapper around reqwest Client for open platform requests.
#[derive(Clone)]
pub struct FeishuHttpClient {
    client: Client,
    base_url: String,
}

impl FeishuHttpClient {
    /// Creates a new HTTP client with the given settings.
    pub fn new(settings: &ClientSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn resolve_url(&self, target: &RequestTarget) -> String {
        match target {
            RequestTarget::Api(path) => format!("{}{}", self.base_url, path),
            RequestTarget::Absolute(url) => url.to_string(),
        }
    }

    fn build_body(
        builder: reqwest::RequestBuilder,
        body: RequestBody,
    ) -> Result<reqwest::RequestBuilder, AppError> {
        Ok(match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder
                .header(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("application/json; charset=utf-8"),
                )
                .body(serde_json::to_vec(&value).map_err(|e| AppError::InternalError {
                    message: "Failed to serialize request body".to_string(),
                    source: Some(Box::new(e)),
                })?),
            RequestBody::ImageUpload {
                image_type,
                file_name,
                bytes,
            } => {
                let part = multipart::Part::bytes(bytes).file_name(file_name);
                let form = multipart::Form::new()
                    .text("image_type", image_type)
                    .part("image", part);
                builder.multipart(form)
            }
        })
    }
}

#[async_trait::async_trait]
impl FeishuTransport for FeishuHttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse<String>, AppError> {
        let url = self.resolve_url(&request.target);
        log::debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.header(header::AUTHORIZATION, token.bearer());
        }
        builder = Self::build_body(builder, request.body)?;

        let response = builder.send().await?;
        log::debug!("{} {} -> {}", request.method, url, response.status());
        extract_response_text(response).await
    }
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let log_id = response
        .headers()
        .get(FEISHU_LOG_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
        log_id,
    })
}
