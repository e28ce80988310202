// src/api/anthropic.rs
//! Anthropic Messages API client.

use super::client::HttpExecutor;
use super::parser;
use crate::config::AnthropicConfig;
use crate::error::{AppError, Service};
use crate::pipeline::LanguageModel;
use reqwest::Method;
use serde::{Deserialize, Serialize};

const MESSAGES_ENDPOINT: &str = "/v1/messages";

/// Per-call overrides of the configured model defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl CompletionOptions {
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            model: None,
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

/// One block of the reply. Only `text` blocks carry text.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl MessageResponse {
    /// Concatenation of every text block, in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect()
    }
}

#[derive(Clone)]
pub struct AnthropicClient {
    executor: HttpExecutor,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, AppError> {
        let executor = HttpExecutor::new(Service::Anthropic, config.api.clone())?;
        Ok(Self { executor, config })
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Builds a single-turn request, filling unset options from the config.
    pub fn request_for(&self, prompt: &str, options: &CompletionOptions) -> MessageRequest {
        MessageRequest {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: options.temperature.unwrap_or(self.config.temperature),
            messages: vec![Message::user(prompt)],
        }
    }

    pub async fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, AppError> {
        let body = serde_json::to_value(request).map_err(|e| {
            AppError::InvalidInput(format!("Unserializable message request: {}", e))
        })?;
        let response = self
            .executor
            .execute(Method::POST, MESSAGES_ENDPOINT, Some(&body))
            .await?;
        parser::decode(Service::Anthropic, response)
    }
}

#[async_trait::async_trait]
impl LanguageModel for AnthropicClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, AppError> {
        let request = self.request_for(prompt, options);
        log::debug!(
            "Requesting completion from {} (max_tokens {}, temperature {})",
            request.model,
            request.max_tokens,
            request.temperature
        );
        let response = self.create_message(&request).await?;
        Ok(response.text())
    }
}
