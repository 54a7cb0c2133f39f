/*!
 * Tests for the provider-backed translation service
 */

use std::time::Instant;
use yajtwai::app_config::TranslationProvider;
use yajtwai::errors::ProviderError;
use yajtwai::providers::mock::MockProvider;
use yajtwai::translation::{TranslationPort, TranslationRequest, TranslationService};

use crate::common;

/// Test that the mock provider config gives an offline service
#[tokio::test]
async fn test_translation_service_withMockConfig_shouldTranslateOffline() {
    let config = common::mock_config("ar");
    let service = TranslationService::new(config.translation, "en").unwrap();

    let translated = service.translate(&TranslationRequest::new("Save", "ar")).await.unwrap();

    assert_eq!(translated, "[ar] Save");
    assert!(service.test_connection().await.is_ok());
}

/// Test that a successful request is sent exactly once
#[tokio::test]
async fn test_translate_withWorkingProvider_shouldSendOneRequest() {
    let config = common::mock_config("fr");
    let provider = MockProvider::working().with_translation("Open", "Ouvrir");
    let service = TranslationService::with_mock_provider(config.translation, "en", provider.clone());

    let translated = service.translate(&TranslationRequest::new("Open", "fr")).await.unwrap();

    assert_eq!(translated, "Ouvrir");
    assert_eq!(provider.request_count(), 1);
}

/// Test that retries stop after the configured count
#[tokio::test]
async fn test_translate_withPersistentFailure_shouldRetryConfiguredTimes() {
    let mut config = common::mock_config("fr");
    config.translation.common.retry_count = 1;
    let provider = MockProvider::failing();
    let service = TranslationService::with_mock_provider(config.translation, "en", provider.clone());

    let error = service.translate(&TranslationRequest::new("x", "fr")).await.unwrap_err();

    assert!(matches!(error, ProviderError::ApiError { .. }));
    assert_eq!(provider.request_count(), 2);
}

/// Test the spacing between requests
#[tokio::test]
async fn test_translate_withRateLimitDelay_shouldSpaceRequests() {
    let mut config = common::mock_config("fr");
    config.translation.common.rate_limit_delay_ms = 50;
    let service = TranslationService::with_mock_provider(config.translation, "en", MockProvider::echo());

    let started = Instant::now();
    for text in ["a", "b", "c"] {
        service.translate(&TranslationRequest::new(text, "fr")).await.unwrap();
    }

    assert!(started.elapsed().as_millis() >= 100);
}

/// Test that the service refuses a malformed endpoint
#[test]
fn test_translation_service_withBadEndpoint_shouldFailToBuild() {
    let mut config = common::mock_config("fr");
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.active_provider_config_mut().endpoint = "http://".to_string();

    assert!(TranslationService::new(config.translation, "en").is_err());
}

/// Test the prompt given to LLM providers
#[test]
fn test_system_prompt_withAutoSource_shouldNameTargetLanguage() {
    let mut config = common::mock_config("es");
    config.translation.common.system_prompt = "{source_language} => {target_language}".to_string();
    let service = TranslationService::new(config.translation, "auto").unwrap();

    assert_eq!(service.system_prompt("es"), "the detected source language => Spanish");
}
