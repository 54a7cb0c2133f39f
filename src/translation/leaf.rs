/*!
 * Translation of a single string leaf.
 */

use std::sync::Arc;

use crate::errors::ProviderError;
use crate::translation::formatting::sanitize_translation;
use crate::translation::observer::{TraceObserver, TraceRecord};
use crate::translation::port::{TranslationPort, TranslationRequest};

/// Sends one string through the translation port and sanitizes the answer
#[derive(Clone)]
pub struct LeafTranslator {
    port: Arc<dyn TranslationPort>,
    observer: Option<Arc<dyn TraceObserver>>,
}

impl LeafTranslator {
    pub fn new(port: Arc<dyn TranslationPort>) -> Self {
        Self { port, observer: None }
    }

    /// Attach an observer that receives a record per translated leaf
    pub fn with_observer(mut self, observer: Arc<dyn TraceObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Translate a leaf that has no meaningful location
    pub async fn translate_leaf(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        self.translate_leaf_at("$", text, target_language).await
    }

    /// Translate the leaf found at `path`
    ///
    /// Empty text is returned as-is without touching the port. Otherwise the
    /// port is called exactly once; there is no retry at this level.
    pub async fn translate_leaf_at(
        &self,
        path: &str,
        text: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let request = TranslationRequest::new(text, target_language);
        let translated = match self.port.translate(&request).await {
            Ok(translated) => sanitize_translation(&translated),
            Err(error) => {
                if let Some(observer) = &self.observer {
                    observer.on_failure(path, &error);
                }
                return Err(error);
            }
        };

        if let Some(observer) = &self.observer {
            observer.on_leaf(&TraceRecord {
                path: path.to_string(),
                source_text: request.text,
                target_language: request.target_language,
                translated_text: translated.clone(),
            });
        }

        Ok(translated)
    }
}
