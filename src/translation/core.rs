/*!
 * Core translation service implementation.
 *
 * `TranslationService` wraps one configured provider behind the
 * [`TranslationPort`] boundary and owns the request policy around it:
 * spacing between requests, a per-request timeout, and retries with
 * exponential backoff for transient failures.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::google::{GoogleTranslate, GoogleTranslateRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::translation::formatting::clean_model_output;
use crate::translation::port::{TranslationPort, TranslationRequest};

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Google Cloud Translation
    Google { client: GoogleTranslate },

    /// Ollama LLM service
    Ollama { client: Ollama },

    /// OpenAI API service
    OpenAI { client: OpenAI },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio { client: OpenAI },

    /// Anthropic API service
    Anthropic { client: Anthropic },

    /// In-process provider, no network
    Mock { client: MockProvider },
}

/// Main translation service
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Source language of every request, or "auto"
    source_language: String,

    /// Minimum spacing between two requests
    min_interval: Duration,

    /// When the previous request was sent
    last_request: Mutex<Option<Instant>>,
}

/// Add a scheme to a bare `host:port` endpoint and check that it parses
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Spacing implied by a fixed delay and a requests-per-minute limit, whichever is larger
fn request_interval(rate_limit_delay_ms: u64, rate_limit: Option<u32>) -> Duration {
    let from_rate = match rate_limit {
        Some(per_minute) if per_minute > 0 => 60_000 / per_minute as u64,
        _ => 0,
    };
    Duration::from_millis(rate_limit_delay_ms.max(from_rate))
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig, source_language: &str) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::Google => TranslationProviderImpl::Google {
                client: GoogleTranslate::new(
                    config.get_api_key(),
                    normalize_endpoint(&config.get_endpoint())?,
                    timeout_secs,
                ),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::from_url(normalize_endpoint(&config.get_endpoint())?, timeout_secs),
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.get_api_key(), normalize_endpoint(&config.get_endpoint())?, timeout_secs),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio does not check the key, but the header must be present
                let api_key = {
                    let k = config.get_api_key();
                    if k.is_empty() { "lm-studio".to_string() } else { k }
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new(api_key, normalize_endpoint(&config.get_endpoint())?, timeout_secs),
                }
            }
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(
                    config.get_api_key(),
                    normalize_endpoint(&config.get_endpoint())?,
                    config.get_model(),
                    timeout_secs,
                ),
            },
            ConfigTranslationProvider::Mock => TranslationProviderImpl::Mock {
                client: MockProvider::working(),
            },
        };

        Ok(Self::with_provider(provider, config, source_language))
    }

    /// Service backed by a specific mock, keeping the configured request policy
    pub fn with_mock_provider(config: TranslationConfig, source_language: &str, client: MockProvider) -> Self {
        Self::with_provider(TranslationProviderImpl::Mock { client }, config, source_language)
    }

    fn with_provider(provider: TranslationProviderImpl, config: TranslationConfig, source_language: &str) -> Self {
        let min_interval = request_interval(config.common.rate_limit_delay_ms, config.get_rate_limit());
        Self {
            provider,
            config,
            source_language: source_language.to_string(),
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        debug!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.config.get_model()
        );
        match &self.provider {
            TranslationProviderImpl::Google { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.test_connection().await
            }
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        }
    }

    /// Instructions sent to LLM providers for one target language
    pub fn system_prompt(&self, target_language: &str) -> String {
        let source_name = if self.source_language.eq_ignore_ascii_case("auto") {
            "the detected source language".to_string()
        } else {
            language_name_or_code(&self.source_language)
        };

        self.config
            .common
            .system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &language_name_or_code(target_language))
    }

    /// Wait until the configured spacing since the previous request has passed
    async fn wait_for_slot(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let ready_at = last + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tokio::time::sleep(ready_at - now).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    /// One request to the provider, without retry
    async fn dispatch(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;

        let translated = match &self.provider {
            TranslationProviderImpl::Google { client } => {
                let target = language_utils::normalize_to_part1_or_part2t(&request.target_language)
                    .map_err(|e| ProviderError::UnsupportedLanguage(e.to_string()))?;
                let mut google_request = GoogleTranslateRequest::new(&request.text, target).model(model);
                if !self.source_language.eq_ignore_ascii_case("auto") {
                    let source = language_utils::normalize_to_part1_or_part2t(&self.source_language)
                        .map_err(|e| ProviderError::UnsupportedLanguage(e.to_string()))?;
                    google_request = google_request.source(source);
                }
                let response = client.complete(google_request).await?;
                if let Some(detected) = response
                    .data
                    .translations
                    .first()
                    .and_then(|t| t.detected_source_language.as_deref())
                {
                    debug!("Google Translate detected source language '{}'", detected);
                }
                let translated = GoogleTranslate::extract_text(&response);
                return ensure_translated(self.config.provider.display_name(), &request.text, translated);
            }
            TranslationProviderImpl::Ollama { client } => {
                let generation = GenerationRequest::new(model, &request.text)
                    .system(self.system_prompt(&request.target_language))
                    .temperature(temperature);
                Ollama::extract_text(&client.complete(generation).await?)
            }
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                let completion = OpenAIRequest::new(model.clone())
                    .add_message("system", self.system_prompt(&request.target_language))
                    .add_message("user", &request.text)
                    .temperature(temperature)
                    .max_tokens(max_tokens_for_model(&model));
                OpenAI::extract_text(&client.complete(completion).await?)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let message = AnthropicRequest::new(model.clone(), max_tokens_for_model(&model))
                    .system(self.system_prompt(&request.target_language))
                    .add_message("user", &request.text)
                    .temperature(temperature);
                Anthropic::extract_text(&client.complete(message).await?)
            }
            TranslationProviderImpl::Mock { client } => {
                let response = client
                    .complete(MockRequest {
                        text: request.text.clone(),
                        target_language: request.target_language.clone(),
                    })
                    .await?;
                return Ok(MockProvider::extract_text(&response));
            }
        };

        let cleaned = clean_model_output(&request.text, &translated);
        ensure_translated(self.config.provider.display_name(), &request.text, cleaned)
    }
}

#[async_trait]
impl TranslationPort for TranslationService {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let max_retries = self.config.common.retry_count;
        let timeout_secs = self.config.get_timeout_secs();
        let mut attempt = 0;

        loop {
            self.wait_for_slot().await;

            let result = match tokio::time::timeout(Duration::from_secs(timeout_secs), self.dispatch(request)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(timeout_secs)),
            };

            match result {
                Ok(translated) => return Ok(translated),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    let backoff_ms = backoff_delay_ms(self.config.common.retry_backoff_ms, attempt);
                    warn!(
                        "{} request failed: {} - attempt {}/{}, retrying in {}ms",
                        self.config.provider.display_name(),
                        e,
                        attempt,
                        max_retries + 1,
                        backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Reject a blank answer for a non-blank source text
fn ensure_translated(provider_name: &str, source: &str, translated: String) -> Result<String, ProviderError> {
    if translated.trim().is_empty() && !source.trim().is_empty() {
        return Err(ProviderError::ParseError(format!(
            "{} returned an empty translation",
            provider_name
        )));
    }
    Ok(translated)
}

/// Exponential backoff before retry number `attempt` (1-based)
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(16))
}

fn language_name_or_code(code: &str) -> String {
    language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string())
}

/// Get the maximum number of tokens for a given model
fn max_tokens_for_model(model: &str) -> u32 {
    match model {
        "gpt-4" | "gpt-4-0613" => 8192,
        "gpt-4-turbo" | "gpt-4-turbo-preview" | "gpt-4o" | "gpt-4o-mini" => 4096,
        "gpt-3.5-turbo" | "gpt-3.5-turbo-0613" => 4096,

        "claude-3-opus-20240229" | "claude-3-sonnet-20240229" | "claude-3-haiku-20240307" => 4096,

        // UI strings are short
        _ => 2048,
    }
}
