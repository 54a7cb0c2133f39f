/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - Google: Google Cloud Translation v2 REST API
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Mock: Deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use reqwest::Response;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Map a transport-level reqwest failure onto the provider taxonomy
pub(crate) fn map_transport_error(provider: &str, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::ConnectionError(format!("{} request timed out: {}", provider, error))
    } else if error.is_connect() {
        ProviderError::ConnectionError(format!("Failed to connect to {}: {}", provider, error))
    } else {
        ProviderError::RequestFailed(format!("Failed to send request to {}: {}", provider, error))
    }
}

/// Turn a non-success HTTP response into a provider error, keeping the body
pub(crate) async fn error_from_response(provider: &str, response: Response) -> ProviderError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, error_text);
    ProviderError::from_status(status.as_u16(), error_text)
}

pub mod anthropic;
pub mod google;
pub mod mock;
pub mod ollama;
pub mod openai;
