/*!
 * The boundary between the document pipeline and whatever performs the
 * actual translation.
 */

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::ProviderError;

/// A single string headed for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text of the leaf, never empty
    pub text: String,
    /// Target language code (ISO 639-1 style)
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
        }
    }
}

/// Anything that can turn one string into its translation
///
/// Implementations own their retry, timeout and rate limiting policy. The
/// pipeline calls `translate` exactly once per non-empty leaf.
#[async_trait]
pub trait TranslationPort: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;
}

#[async_trait]
impl<T: TranslationPort + ?Sized> TranslationPort for Arc<T> {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        (**self).translate(request).await
    }
}

#[async_trait]
impl<T: TranslationPort + ?Sized> TranslationPort for Box<T> {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        (**self).translate(request).await
    }
}
