// src/api/client.rs
//! Retrying HTTP executor shared by the service clients.
//!
//! Wraps a reqwest `Client` configured from an [`ApiConfig`]: base URL,
//! default headers, per-request timeout and retry policy. Each call is
//! retried on transport failures and non-2xx responses; JSON decoding of a
//! successful body happens once, after the retry loop.

use super::parser;
use crate::config::ApiConfig;
use crate::error::{AppError, Service};
use crate::error_recovery::retry_with_backoff;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde_json::Value;

/// Executes requests against one external API.
#[derive(Clone)]
pub struct HttpExecutor {
    client: Client,
    config: ApiConfig,
    service: Service,
}

impl HttpExecutor {
    /// Creates a client whose default headers and timeout come from `config`.
    pub fn new(service: Service, config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(&config)?)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            config,
            service,
        })
    }

    fn create_headers(config: &ApiConfig) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();
        for (name, value) in config.headers() {
            let name = header::HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid header name '{}': {}", name, e))
            })?;
            let value = header::HeaderValue::from_str(value).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid value for header {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn service(&self) -> Service {
        self.service
    }

    /// Sends `method endpoint` with an optional JSON body and decodes the JSON reply.
    ///
    /// A successful response with an empty body decodes to `Value::Null`.
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        let url = self.config.url_for(endpoint);
        let label = format!("{} {} {}", self.service, method, endpoint);

        let response = self
            .send(&label, |client| {
                let request = client.request(method.clone(), &url);
                match body {
                    Some(body) => request.json(body),
                    None => request,
                }
            })
            .await?;

        parser::parse_json_body(self.service, &response)
    }

    /// Sends a request built by `build`, retrying per the configured policy.
    ///
    /// `build` is called once per attempt so bodies and headers are rebuilt
    /// fresh every time. The response body is returned as raw bytes.
    pub async fn send<F>(&self, label: &str, build: F) -> Result<ApiResponse<Vec<u8>>, AppError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let build = &build;
        let client = &self.client;
        let service = self.service;

        retry_with_backoff(self.config.retry(), label, move || async move {
            log::debug!("{}", label);
            let response = build(client).send().await?;
            let response = extract_response_bytes(response).await?;
            parser::ensure_success(service, &response)?;
            Ok(response)
        })
        .await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as bytes with metadata.
pub async fn extract_response_bytes(response: Response) -> Result<ApiResponse<Vec<u8>>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let data = response.bytes().await?.to_vec();

    Ok(ApiResponse { data, status, url })
}
