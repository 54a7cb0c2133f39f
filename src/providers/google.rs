/*!
 * Google Cloud Translation (v2 "basic") client.
 *
 * Unlike the LLM-backed providers this is a dedicated machine translation
 * endpoint: one string in, one string out, no prompt.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, error_from_response, map_transport_error};

const PROVIDER_NAME: &str = "Google Translate";

/// Google Cloud Translation client
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as the `key` query parameter
    api_key: String,
    /// Base URL, e.g. `https://translation.googleapis.com`
    endpoint: String,
}

/// Translation request body for `POST /language/translate/v2`
#[derive(Debug, Clone, Serialize)]
pub struct GoogleTranslateRequest {
    /// Text to translate
    q: String,
    /// Target language code
    target: String,
    /// Source language code; detected by the service when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    /// `text` keeps the service from HTML-escaping the output
    format: String,
    /// Translation model (`base` or `nmt`)
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl GoogleTranslateRequest {
    /// Create a plain-text translation request
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            q: text.into(),
            target: target.into(),
            source: None,
            format: "text".to_string(),
            model: None,
        }
    }

    /// Pin the source language instead of relying on detection
    pub fn source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        if !source.is_empty() && source != "auto" {
            self.source = Some(source);
        }
        self
    }

    /// Select the translation model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.is_empty() {
            self.model = Some(model);
        }
        self
    }
}

/// Successful response envelope
#[derive(Debug, Deserialize)]
pub struct GoogleTranslateResponse {
    pub data: GoogleTranslations,
}

#[derive(Debug, Deserialize)]
pub struct GoogleTranslations {
    pub translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    #[serde(rename = "detectedSourceLanguage", default)]
    pub detected_source_language: Option<String>,
}

/// Error envelope: `{"error": {"code": 400, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    code: u16,
    message: String,
}

impl GoogleTranslate {
    /// Create a new Google Translate client
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

    fn base_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://translation.googleapis.com".to_string()
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        }
    }

    /// Interpret an error body returned by the service
    fn classify_error(status_code: u16, body: &str) -> ProviderError {
        let (code, message) = match serde_json::from_str::<GoogleErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (status_code, body.to_string()),
        };

        let lowered = message.to_lowercase();
        if code == 400 && (lowered.contains("language") || lowered.contains("invalid value")) {
            return ProviderError::UnsupportedLanguage(message);
        }
        if code == 403 && (lowered.contains("quota") || lowered.contains("limit")) {
            return ProviderError::RateLimitExceeded(message);
        }
        ProviderError::from_status(code, message)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = GoogleTranslateRequest;
    type Response = GoogleTranslateResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = format!("{}/language/translate/v2", self.base_url());

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(PROVIDER_NAME, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            log::error!("{} API error ({}): {}", PROVIDER_NAME, status, body);
            return Err(Self::classify_error(status.as_u16(), &body));
        }

        let parsed: GoogleTranslateResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("{}: {}", PROVIDER_NAME, e)))?;

        if parsed.data.translations.is_empty() {
            return Err(ProviderError::ParseError(format!(
                "{} returned no translations",
                PROVIDER_NAME
            )));
        }

        Ok(parsed)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/language/translate/v2/languages", self.base_url());
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| map_transport_error(PROVIDER_NAME, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER_NAME, response).await);
        }
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response
            .data
            .translations
            .first()
            .map(|t| t.translated_text.clone())
            .unwrap_or_default()
    }
}
