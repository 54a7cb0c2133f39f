/*!
 * Integration tests for translating whole documents
 */

use anyhow::Result;
use indicatif::ProgressBar;
use serde_json::{Value, json};
use std::fs;
use std::sync::Arc;
use yajtwai::errors::PipelineError;
use yajtwai::providers::mock::MockProvider;
use yajtwai::translation::{
    CollectingObserver, DocumentPipeline, FailurePolicy, LeafTranslator, ProgressObserver, TranslationService,
    TreeWalker,
};

use crate::common;

/// Test the greeting scenario end to end
#[tokio::test]
async fn test_pipeline_withGreetingBundle_shouldWriteFrenchBundle() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        temp_dir.path(),
        "desktop-en.json",
        r#"{"greeting":"Hello","count":3,"nested":{"farewell":"Goodbye"}}"#,
    )?;
    let target = temp_dir.path().join("desktop-fr.json");
    let provider = MockProvider::working()
        .with_translation("Hello", "Bonjour")
        .with_translation("Goodbye", "Au revoir");

    let completion = common::pipeline_with(provider.clone()).run(&source, &target, "fr").await?;

    let written: Value = serde_json::from_str(&fs::read_to_string(&target)?)?;
    assert_eq!(
        written,
        json!({"greeting": "Bonjour", "count": 3, "nested": {"farewell": "Au revoir"}})
    );
    assert_eq!(completion.translated, 2);
    assert_eq!(completion.passed_through, 1);
    assert_eq!(provider.request_count(), 2);
    Ok(())
}

/// Test that a failing leaf leaves an existing target alone
#[tokio::test]
async fn test_pipeline_withFailingLeaf_shouldKeepPreviousTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(
        temp_dir.path(),
        "desktop-en.json",
        r#"{"greeting":"Hello","nested":{"farewell":"Goodbye"}}"#,
    )?;
    let target = common::create_test_file(temp_dir.path(), "desktop-fr.json", "{\"old\": true}\n")?;
    let provider = MockProvider::working().failing_on("Goodbye");

    let error = common::pipeline_with(provider).run(&source, &target, "fr").await.unwrap_err();

    match error {
        PipelineError::TranslationFailure { path, text, .. } => {
            assert_eq!(path, "nested.farewell");
            assert_eq!(text, "Goodbye");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fs::read_to_string(&target)?, "{\"old\": true}\n");
    Ok(())
}

/// Test that quotes in provider output never break the written JSON
#[tokio::test]
async fn test_pipeline_withQuotedTranslation_shouldWriteSingleQuotes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "en.json", r#"{"line":"He said hi"}"#)?;
    let target = temp_dir.path().join("fr.json");
    let provider = MockProvider::working().with_translation("He said hi", "He said \"hi\"");

    common::pipeline_with(provider).run(&source, &target, "fr").await?;

    let written: Value = serde_json::from_str(&fs::read_to_string(&target)?)?;
    assert_eq!(written["line"], "He said 'hi'");
    Ok(())
}

/// Test that concurrency does not change a single byte of the output
#[tokio::test]
async fn test_pipeline_withConcurrency_shouldMatchSequentialOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let entries: serde_json::Map<String, Value> = (0..40)
        .map(|i| (format!("key_{:02}", 40 - i), json!({"label": format!("Label {}", i), "n": i})))
        .collect();
    let source = common::create_test_file(
        temp_dir.path(),
        "big-en.json",
        &serde_json::to_string(&Value::Object(entries))?,
    )?;
    let sequential_target = temp_dir.path().join("sequential.json");
    let concurrent_target = temp_dir.path().join("concurrent.json");

    common::pipeline_with(MockProvider::jittered(20))
        .run(&source, &sequential_target, "de")
        .await?;
    let walker = TreeWalker::new(LeafTranslator::new(Arc::new(MockProvider::jittered(20)))).with_concurrency(8);
    DocumentPipeline::new(walker).run(&source, &concurrent_target, "de").await?;

    assert_eq!(fs::read(&sequential_target)?, fs::read(&concurrent_target)?);
    Ok(())
}

/// Test that the trace observer sees each translated leaf once
#[tokio::test]
async fn test_pipeline_withObserver_shouldTraceEveryTranslatedLeaf() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let target = temp_dir.path().join("desktop-es.json");
    let observer = Arc::new(CollectingObserver::new());
    let leaf = LeafTranslator::new(Arc::new(MockProvider::working())).with_observer(observer.clone());

    let completion = DocumentPipeline::new(TreeWalker::new(leaf)).run(&source, &target, "es").await?;

    let paths: Vec<String> = observer.records().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["app_title", "menu.file", "menu.edit", "tips[0]"]);
    assert_eq!(completion.translated, 4);
    assert_eq!(completion.skipped_empty, 1);
    assert_eq!(completion.passed_through, 3);
    Ok(())
}

/// Test best-effort runs through the provider-backed service
#[tokio::test]
async fn test_pipeline_withBestEffortService_shouldReportFailuresAndWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let target = temp_dir.path().join("out").join("desktop-ar.json");
    let mut config = common::mock_config("ar");
    config.translation.common.retry_count = 0;
    let service = TranslationService::with_mock_provider(
        config.translation,
        "en",
        MockProvider::working().failing_on("Edit"),
    );
    let walker = TreeWalker::new(LeafTranslator::new(Arc::new(service))).with_policy(FailurePolicy::BestEffort);

    let completion = DocumentPipeline::new(walker).run(&source, &target, "ar").await?;

    let written: Value = serde_json::from_str(&fs::read_to_string(&target)?)?;
    assert_eq!(written["menu"]["file"], "[ar] File");
    assert_eq!(written["menu"]["edit"], "Edit");
    assert_eq!(written["tips"][0], "[ar] Press 'Ctrl+S' to save");
    assert_eq!(completion.failures.len(), 1);
    assert_eq!(completion.failures[0].path, "menu.edit");
    Ok(())
}

/// Test that failed leaves still advance the progress bar to the end
#[tokio::test]
async fn test_pipeline_withBestEffortFailures_shouldFillProgressBar() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let target = temp_dir.path().join("desktop-fr.json");
    let bar = ProgressBar::hidden();
    let leaf = LeafTranslator::new(Arc::new(MockProvider::working().failing_on("File").failing_on("Edit")))
        .with_observer(Arc::new(ProgressObserver::new(bar.clone())));
    let walker = TreeWalker::new(leaf).with_policy(FailurePolicy::BestEffort);

    let completion = DocumentPipeline::new(walker)
        .with_progress(bar.clone())
        .run(&source, &target, "fr")
        .await?;

    assert_eq!(completion.failures.len(), 2);
    assert_eq!(bar.length(), Some(4));
    assert_eq!(bar.position(), 4);
    Ok(())
}

/// Test the echo round trip keeps the sample bundle apart from quote sanitizing
#[tokio::test]
async fn test_pipeline_withEchoProvider_shouldReproduceSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let target = temp_dir.path().join("copy.json");

    common::pipeline_with(MockProvider::echo()).run(&source, &target, "en").await?;

    let written: Value = serde_json::from_str(&fs::read_to_string(&target)?)?;
    let original: Value = serde_json::from_str(common::SAMPLE_BUNDLE)?;
    assert_eq!(written["menu"], original["menu"]);
    assert_eq!(written["tips"][0], "Press 'Ctrl+S' to save");
    assert_eq!(written["tips"][1], "");
    assert_eq!(written["beta"], false);
    assert_eq!(written["footer"], Value::Null);
    Ok(())
}

/// Test error variants for unusable inputs
#[tokio::test]
async fn test_pipeline_withBadInputs_shouldReturnTypedErrors() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.json");
    let pipeline = common::pipeline_with(MockProvider::working());

    let missing = pipeline.run(&temp_dir.path().join("nope.json"), &target, "fr").await;
    assert!(matches!(missing, Err(PipelineError::NotFound { .. })));

    let malformed_source = common::create_test_file(temp_dir.path(), "bad.json", "{\"a\": [1, 2}")?;
    let malformed = pipeline.run(&malformed_source, &target, "fr").await;
    assert!(matches!(malformed, Err(PipelineError::MalformedInput { .. })));

    let empty_language = pipeline.run(&malformed_source, &target, " ").await;
    assert!(matches!(empty_language, Err(PipelineError::InvalidConfig(_))));

    assert!(!target.exists());
    Ok(())
}
