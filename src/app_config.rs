use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or "auto" to let the provider detect it
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Cloud Translation v2
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
    // @provider: Offline mock that tags each string with the target language
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }

    // @returns: Environment variable consulted when no API key is configured
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Google => Some("GOOGLE_TRANSLATE_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama | Self::LMStudio | Self::Mock => None,
        }
    }

    // @returns: Whether the provider refuses requests without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Google | Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(provider_type),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(provider_type),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Minimum delay in milliseconds between consecutive requests
    #[serde(default)]
    pub rate_limit_delay_ms: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of strings translated at the same time; 1 is sequential
    #[serde(default = "default_concurrent_leaves")]
    pub concurrent_leaves: usize,

    /// Keep the source text for strings that fail instead of aborting
    #[serde(default)]
    pub best_effort: bool,

    /// Indentation width of the written document
    #[serde(default = "default_output_indent")]
    pub output_indent: usize,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            rate_limit_delay_ms: 0,
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            concurrent_leaves: default_concurrent_leaves(),
            best_effort: false,
            output_indent: default_output_indent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_concurrent_leaves() -> usize {
    1
}

fn default_output_indent() -> usize {
    crate::translation::document::DEFAULT_INDENT
}

fn default_endpoint(provider: TranslationProvider) -> String {
    match provider {
        TranslationProvider::Google => "https://translation.googleapis.com".to_string(),
        TranslationProvider::Ollama => "http://localhost:11434".to_string(),
        TranslationProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        TranslationProvider::Anthropic => "https://api.anthropic.com".to_string(),
        // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
        TranslationProvider::LMStudio => "http://localhost:1234/v1".to_string(),
        TranslationProvider::Mock => String::new(),
    }
}

fn default_model(provider: TranslationProvider) -> String {
    match provider {
        // "nmt" or "base"; empty lets the service choose
        TranslationProvider::Google => String::new(),
        TranslationProvider::Ollama => "llama3.2:3b".to_string(),
        TranslationProvider::OpenAI => "gpt-4o-mini".to_string(),
        TranslationProvider::Anthropic => "claude-3-haiku-20240307".to_string(),
        TranslationProvider::LMStudio => "local-model".to_string(),
        TranslationProvider::Mock => String::new(),
    }
}

fn default_rate_limit(provider: TranslationProvider) -> Option<u32> {
    match provider {
        TranslationProvider::Google => Some(600),
        TranslationProvider::OpenAI => Some(60),
        // Slightly below Anthropic's standard 50 requests per minute
        TranslationProvider::Anthropic => Some(45),
        TranslationProvider::Ollama | TranslationProvider::LMStudio | TranslationProvider::Mock => None,
    }
}

fn default_system_prompt() -> String {
    "You are a professional software localizer. Translate the user's text from {source_language} to {target_language}. \
     It is a single string from an application's user interface. Keep placeholders such as {name}, %s, {{count}} and HTML tags unchanged. \
     Respond with the translated text only, without quotes, explanations or notes.".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if !self.source_language.eq_ignore_ascii_case("auto") {
            crate::language_utils::validate_language_code(&self.source_language)?;
        }

        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        for target in self.target_languages() {
            crate::language_utils::validate_language_code(&target)?;
        }

        let provider = self.translation.provider;
        if provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider (set it in the config or via {})",
                provider.display_name(),
                provider.api_key_env().unwrap_or("the config file")
            ));
        }

        let common = &self.translation.common;
        if common.concurrent_leaves == 0 {
            return Err(anyhow!("concurrent_leaves must be at least 1"));
        }
        if !(0.0..=2.0).contains(&common.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 2.0, got {}", common.temperature));
        }

        Ok(())
    }

    /// Target languages, split on commas (`"ar,es"` runs twice)
    pub fn target_languages(&self) -> Vec<String> {
        self.target_language
            .split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) if !provider_config.model.is_empty() => provider_config.model.clone(),
            _ => default_model(self.provider),
        }
    }

    /// Get the API key for the active provider, falling back to its environment variable
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        self.provider
            .api_key_env()
            .and_then(|name| std::env::var(name).ok())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        match self.get_active_provider_config() {
            Some(provider_config) if !provider_config.endpoint.is_empty() => provider_config.endpoint.clone(),
            _ => default_endpoint(self.provider),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => default_timeout_secs(),
        }
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        match self.get_active_provider_config() {
            Some(provider_config) => provider_config.rate_limit,
            None => default_rate_limit(self.provider),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: [
                TranslationProvider::Google,
                TranslationProvider::Ollama,
                TranslationProvider::OpenAI,
                TranslationProvider::Anthropic,
                TranslationProvider::LMStudio,
            ]
            .into_iter()
            .map(ProviderConfig::new)
            .collect(),
            common: TranslationCommonConfig::default(),
        }
    }
}
