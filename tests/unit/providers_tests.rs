/*!
 * Tests for provider implementations
 */

use std::sync::Arc;
use yajtwai::errors::ProviderError;
use yajtwai::providers::Provider;
use yajtwai::providers::google::{GoogleTranslate, GoogleTranslateResponse};
use yajtwai::providers::mock::MockProvider;
use yajtwai::providers::ollama::Ollama;
use yajtwai::translation::{TranslationPort, TranslationRequest};

/// Test the mock dictionary and its fallback
#[tokio::test]
async fn test_mock_provider_withDictionary_shouldTranslateKnownTexts() {
    let provider = MockProvider::working().with_translation("Hello", "Bonjour");

    let known = provider.translate(&TranslationRequest::new("Hello", "fr")).await.unwrap();
    let unknown = provider.translate(&TranslationRequest::new("Bye", "fr")).await.unwrap();

    assert_eq!(known, "Bonjour");
    assert_eq!(unknown, "[fr] Bye");
    assert_eq!(provider.request_count(), 2);
}

/// Test that the mock can stand behind a shared trait object
#[tokio::test]
async fn test_mock_provider_behindArc_shouldShareRequestLog() {
    let provider = MockProvider::echo();
    let port: Arc<dyn TranslationPort> = Arc::new(provider.clone());

    port.translate(&TranslationRequest::new("one", "de")).await.unwrap();
    port.translate(&TranslationRequest::new("two", "de")).await.unwrap();

    let texts: Vec<String> = provider.requests().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["one", "two"]);
}

/// Test the failing mock
#[tokio::test]
async fn test_mock_provider_withFailingBehavior_shouldReturnRetryableError() {
    let provider = MockProvider::failing();

    let error = provider.translate(&TranslationRequest::new("x", "fr")).await.unwrap_err();

    assert!(matches!(error, ProviderError::ApiError { status_code: 500, .. }));
    assert!(error.is_retryable());
    assert!(provider.test_connection().await.is_err());
}

/// Test parsing of a Google Translate v2 response body
#[test]
fn test_google_response_withTranslations_shouldExtractFirstText() {
    let body = r#"{"data":{"translations":[{"translatedText":"مرحبا","detectedSourceLanguage":"en"}]}}"#;

    let response: GoogleTranslateResponse = serde_json::from_str(body).unwrap();

    assert_eq!(GoogleTranslate::extract_text(&response), "مرحبا");
}

/// Test parsing of a streamed Ollama body
#[test]
fn test_ollama_parse_generation_withJsonLines_shouldJoinChunks() {
    let body = "{\"model\":\"m\",\"response\":\"Bon\",\"done\":false}\n{\"model\":\"m\",\"response\":\"jour\",\"done\":true}\n";

    let response = Ollama::parse_generation(body).unwrap();

    assert_eq!(Ollama::extract_text(&response), "Bonjour");
}

/// Test that an unreachable server is reported as a connection problem
#[tokio::test]
async fn test_ollama_test_connection_withUnreachableServer_shouldFail() {
    let client = Ollama::from_url("http://127.0.0.1:1", 2);

    let error = client.test_connection().await.unwrap_err();

    assert!(error.is_retryable(), "unexpected error: {:?}", error);
}
