//! OpenAI-compatible chat-completions client

use crate::config::InferenceConfig;
use crate::extract::inference::{parse_inference_reply, Inference, InferenceClient, InferenceRequest};
use crate::{ConfigError, ScoutError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference client for any endpoint speaking the chat-completions protocol
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiClient {
    /// Builds a client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Full chat-completions URL
    /// * `model` - Model name sent with each request
    /// * `api_key` - Bearer token
    /// * `timeout` - Per-request timeout
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Builds a client from `[inference]`, reading the key from the environment
    ///
    /// # Errors
    ///
    /// Fails when the variable named by `api-key-env` is unset or blank.
    pub fn from_config(config: &InferenceConfig) -> Result<Self, ScoutError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "environment variable {} is not set",
                    config.api_key_env
                ))
            })?;

        Ok(Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            api_key.trim(),
            Duration::from_secs(config.timeout_secs),
        )?)
    }

    async fn complete(&self, request: &InferenceRequest) -> Result<String, String> {
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("failed to call {}: {}", self.endpoint, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(format!("{} returned {}: {}", self.endpoint, status, text));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| format!("failed to parse chat response: {}", e))?;

        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| "chat response contained no message".to_string())
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn infer(&self, request: &InferenceRequest) -> Inference {
        match self.complete(request).await {
            Ok(reply) => parse_inference_reply(&reply),
            Err(reason) => Inference::Error(reason),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
