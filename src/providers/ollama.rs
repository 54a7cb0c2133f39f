use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::error;

use crate::errors::ProviderError;
use crate::providers::{Provider, error_from_response, map_transport_error};

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    /// How long to keep the model loaded in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<String>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Random seed for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
            keep_alive: None,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Fix the sampling seed so repeated runs give the same output
    pub fn seed(mut self, seed: u64) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).seed = Some(seed);
        self
    }

    /// Set the keep-alive duration
    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL
    ///
    /// Ollama speaks HTTP/1.1 only, and the connection is kept alive between
    /// the one-request-per-leaf calls of a run.
    pub fn from_url(url: impl Into<String>, timeout_secs: u64) -> Self {
        let url = url.into();
        let base_url = if url.starts_with("http://") || url.starts_with("https://") {
            url.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", url.trim_end_matches('/'))
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Parse a generate response, accepting streamed JSONL as a fallback
    ///
    /// Some Ollama builds ignore `stream: false`; the pieces are concatenated
    /// in that case.
    pub fn parse_generation(response_text: &str) -> Result<GenerationResponse, ProviderError> {
        match serde_json::from_str::<GenerationResponse>(response_text) {
            Ok(response) => Ok(response),
            Err(e) => {
                let chunks: Vec<GenerationResponse> = response_text
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .filter_map(|line| serde_json::from_str::<GenerationResponse>(line).ok())
                    .collect();

                let Some(last) = chunks.last() else {
                    error!(
                        "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                        e,
                        response_text.chars().take(500).collect::<String>()
                    );
                    return Err(ProviderError::ParseError(format!("Ollama: {}", e)));
                };

                Ok(GenerationResponse {
                    model: last.model.clone(),
                    created_at: last.created_at.clone(),
                    response: chunks.iter().map(|c| c.response.as_str()).collect(),
                    done: true,
                    prompt_eval_count: last.prompt_eval_count,
                    eval_count: last.eval_count,
                })
            }
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error("Ollama", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        let response_text = response.text().await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text from Ollama API: {}", e)))?;

        Self::parse_generation(&response_text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| map_transport_error("Ollama", e))?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
