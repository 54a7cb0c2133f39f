/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Looks up a dictionary, otherwise tags the text
 * - `MockProvider::echo()` - Returns the input unchanged
 * - `MockProvider::intermittent(n)` - Fails every Nth request
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Every request is recorded so tests can assert on call counts and order.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::port::{TranslationPort, TranslationRequest};

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Target language
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Dictionary lookup, falling back to `[lang] text`
    Working,
    /// Returns the input text unchanged
    Echo,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Like `Working`, but each call sleeps a text-dependent amount so
    /// concurrent calls complete out of order
    Jittered { max_delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Fixed translations by source text
    dictionary: HashMap<String, String>,
    /// Source texts that always fail
    fail_on: HashSet<String>,
    /// Every request received, in arrival order
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            dictionary: HashMap::new(),
            fail_on: HashSet::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that returns its input
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose calls finish in scrambled order
    pub fn jittered(max_delay_ms: u64) -> Self {
        Self::new(MockBehavior::Jittered { max_delay_ms: max_delay_ms.max(1) })
    }

    /// Add a fixed translation
    pub fn with_translation(mut self, source: impl Into<String>, translated: impl Into<String>) -> Self {
        self.dictionary.insert(source.into(), translated.into());
        self
    }

    /// Make requests for this exact text fail
    pub fn failing_on(mut self, source: impl Into<String>) -> Self {
        self.fail_on.insert(source.into());
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().clone()
    }

    fn lookup(&self, request: &MockRequest) -> String {
        self.dictionary
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", request.target_language, request.text))
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(TranslationRequest::new(
            request.text.clone(),
            request.target_language.clone(),
        ));

        if self.fail_on.contains(&request.text) {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated failure for {:?}", request.text),
            });
        }

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse { text: self.lookup(&request) }),

            MockBehavior::Echo => Ok(MockResponse { text: request.text }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse { text: self.lookup(&request) })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Jittered { max_delay_ms } => {
                let seed = request.text.bytes().fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
                tokio::time::sleep(Duration::from_millis(seed % max_delay_ms)).await;
                Ok(MockResponse { text: self.lookup(&request) })
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated provider failure".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}

#[async_trait]
impl TranslationPort for MockProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let response = self
            .complete(MockRequest {
                text: request.text.clone(),
                target_language: request.target_language.clone(),
            })
            .await?;
        Ok(Self::extract_text(&response))
    }
}
