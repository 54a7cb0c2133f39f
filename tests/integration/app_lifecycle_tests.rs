/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use yajtwai::app_config::Config;
use yajtwai::app_controller::Controller;
use yajtwai::providers::mock::MockProvider;

use crate::common;

fn read_json(path: &std::path::Path) -> Result<Value> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldBeInitialized() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert!(controller.is_initialized());
    Ok(())
}

/// Test that an empty target language leaves the controller uninitialized
#[test]
fn test_controller_withEmptyTargetLanguage_shouldNotBeInitialized() -> Result<()> {
    let mut config = Config::default();
    config.target_language = String::new();

    let controller = Controller::with_config(config)?;

    assert!(!controller.is_initialized());
    Ok(())
}

/// Test one input fanned out to several languages
#[test]
fn test_run_withTwoTargetLanguages_shouldWriteBothBundles() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let output_dir = temp_dir.path().join("out");
    let controller = Controller::with_config(common::mock_config("ar,es"))?;

    let summary = tokio_test::block_on(async {
        controller.run(input.clone(), output_dir.clone(), false).await
    })?;

    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.strings_translated, 8);
    assert_eq!(read_json(&output_dir.join("desktop-ar.json"))?["menu"]["file"], "[ar] File");
    assert_eq!(read_json(&output_dir.join("desktop-es.json"))?["app_title"], "[es] Notes");
    Ok(())
}

/// Test that an existing translation is kept without force
#[tokio::test]
async fn test_run_withExistingTarget_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let existing = common::create_test_file(temp_dir.path(), "desktop-fr.json", "{}\n")?;
    let provider = MockProvider::working();
    let controller = Controller::with_config(common::mock_config("fr"))?.with_port(Arc::new(provider.clone()));

    let summary = controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary.skipped, vec![existing.clone()]);
    assert!(summary.written.is_empty());
    assert_eq!(provider.request_count(), 0);
    assert_eq!(fs::read_to_string(&existing)?, "{}\n");
    Ok(())
}

/// Test that force replaces an existing translation
#[tokio::test]
async fn test_run_withForce_shouldOverwriteTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let existing = common::create_test_file(temp_dir.path(), "desktop-fr.json", "{}\n")?;
    let controller = Controller::with_config(common::mock_config("fr"))?;

    let summary = controller.run(input, temp_dir.path().to_path_buf(), true).await?;

    assert_eq!(summary.written, vec![existing.clone()]);
    assert_eq!(read_json(&existing)?["tips"][0], "[fr] Press 'Ctrl+S' to save");
    Ok(())
}

/// Test that the source language is never translated into itself
#[tokio::test]
async fn test_run_withSourceAmongTargets_shouldSkipSourceLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let controller = Controller::with_config(common::mock_config("eng,de"))?;

    let summary = controller.run(input.clone(), temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary.written, vec![temp_dir.path().join("desktop-de.json")]);
    assert_eq!(fs::read_to_string(&input)?, common::SAMPLE_BUNDLE);
    Ok(())
}

/// Test the explicit output file mode
#[tokio::test]
async fn test_run_to_file_withSingleTarget_shouldWriteGivenPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let output = temp_dir.path().join("build").join("arabic.json");
    let controller = Controller::with_config(common::mock_config("ar"))?;

    let summary = controller.run_to_file(input, output.clone(), false).await?;

    assert_eq!(summary.written, vec![output.clone()]);
    assert_eq!(read_json(&output)?["menu"]["recent_count"], 5);
    Ok(())
}

/// Test that an explicit output file refuses several languages
#[tokio::test]
async fn test_run_to_file_withSeveralTargets_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let output = temp_dir.path().join("out.json");
    let controller = Controller::with_config(common::mock_config("ar,es"))?;

    let result = controller.run_to_file(input, output.clone(), false).await;

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

/// Test that folder mode picks only source-language bundles
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldTranslateSourceBundles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    common::create_test_file(temp_dir.path(), "web/site-en.json", r#"{"cta":"Buy now"}"#)?;
    common::create_test_file(temp_dir.path(), "desktop-de.json", r#"{"app_title":"Notizen"}"#)?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not json")?;
    let provider = MockProvider::working();
    let controller = Controller::with_config(common::mock_config("fr"))?.with_port(Arc::new(provider.clone()));

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary.written.len(), 2);
    assert!(temp_dir.path().join("desktop-fr.json").exists());
    assert_eq!(read_json(&temp_dir.path().join("web").join("site-fr.json"))?["cta"], "[fr] Buy now");
    assert!(provider.requests().iter().all(|r| r.text != "Notizen"));
    Ok(())
}

/// Test that folder mode finds tags after multi-part stems
#[tokio::test]
async fn test_run_folder_withMultiPartStems_shouldDetectTrailingTag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "web-ui-en.json", r#"{"cta":"Buy now"}"#)?;
    common::create_test_file(temp_dir.path(), "app-de-en.json", r#"{"title":"Notes"}"#)?;
    let controller = Controller::with_config(common::mock_config("ar"))?;

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary.written.len(), 2);
    assert_eq!(read_json(&temp_dir.path().join("web-ui-ar.json"))?["cta"], "[ar] Buy now");
    assert_eq!(read_json(&temp_dir.path().join("app-de-ar.json"))?["title"], "[ar] Notes");
    Ok(())
}

/// Test that folder mode needs a concrete source language
#[tokio::test]
async fn test_run_folder_withAutoSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let mut config = common::mock_config("fr");
    config.source_language = "auto".to_string();
    let controller = Controller::with_config(config)?;

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());
    Ok(())
}

/// Test that a failing provider surfaces as a run error without output
#[tokio::test]
async fn test_run_withFailingPort_shouldReportErrorAndWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let controller = Controller::with_config(common::mock_config("ar"))?.with_port(Arc::new(MockProvider::failing()));

    let result = controller.run(input, temp_dir.path().to_path_buf(), false).await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("desktop-ar.json").exists());
    Ok(())
}

/// Test that best-effort mode writes the bundle and counts kept strings
#[tokio::test]
async fn test_run_withBestEffort_shouldKeepFailedStrings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_bundle(temp_dir.path(), "desktop-en.json")?;
    let mut config = common::mock_config("ar");
    config.translation.common.best_effort = true;
    config.translation.common.concurrent_leaves = 4;
    let controller = Controller::with_config(config)?.with_port(Arc::new(MockProvider::working().failing_on("Notes")));

    let summary = controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary.strings_kept, 1);
    assert_eq!(summary.strings_translated, 3);
    let written = read_json(&temp_dir.path().join("desktop-ar.json"))?;
    assert_eq!(written["app_title"], "Notes");
    assert_eq!(written["menu"]["edit"], "[ar] Edit");
    Ok(())
}
