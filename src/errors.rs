/*!
 * Error types for the yajtwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with translation provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or exhausted quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider does not support the requested language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Whether retrying the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_)
            | Self::ConnectionError(_)
            | Self::RateLimitExceeded(_)
            | Self::Timeout(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) | Self::UnsupportedLanguage(_) => false,
        }
    }

    /// Map an HTTP error status and body to the matching provider error
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors that abort a document pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source document does not exist
    #[error("Source document not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The source document is not valid JSON
    #[error("Malformed input in {}: {detail}", path.display())]
    MalformedInput { path: PathBuf, detail: String },

    /// The source document exists but could not be read
    #[error("Failed to read {}: {detail}", path.display())]
    ReadFailure { path: PathBuf, detail: String },

    /// A string leaf could not be translated
    #[error("Translation failed at '{path}' for text {text:?}: {source}")]
    TranslationFailure {
        /// Location of the leaf inside the document
        path: String,
        /// The untranslated source text
        text: String,
        #[source]
        source: ProviderError,
    },

    /// The translated document could not be written
    #[error("Failed to write {}: {detail}", path.display())]
    WriteFailure { path: PathBuf, detail: String },

    /// The run was started with unusable parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a pipeline run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
