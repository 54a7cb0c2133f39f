use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, error_from_response, map_transport_error};

/// Client for OpenAI-compatible chat completion APIs (OpenAI, LM Studio)
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Base URL including the version segment, e.g. `https://api.openai.com/v1`
    endpoint: String,
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the conversation
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the completion length
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn completions_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/chat/completions".to_string()
        } else {
            format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
        }
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let response = self.client.post(self.completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error("OpenAI", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("OpenAI", response).await);
        }

        let parsed = response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("OpenAI: {}", e)))?;

        if parsed.choices.is_empty() {
            return Err(ProviderError::ParseError("OpenAI-compatible provider returned no choices".to_string()));
        }
        Ok(parsed)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = if self.endpoint.is_empty() {
            "https://api.openai.com/v1/models".to_string()
        } else {
            format!("{}/models", self.endpoint.trim_end_matches('/'))
        };

        let response = self.client.get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| map_transport_error("OpenAI", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("OpenAI", response).await);
        }
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.choices.first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
