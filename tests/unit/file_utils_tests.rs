/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use yajtwai::file_utils::FileManager;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "desktop-en.json", "{}")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.json"));
}

/// Test that generate_output_path swaps the language tag of the original file naming
#[test]
fn test_generate_output_path_withLanguageSuffix_shouldReplaceIt() {
    let output_path = FileManager::generate_output_path("/tmp/input/desktop-en.json", "/tmp/output", "es");

    assert_eq!(output_path, Path::new("/tmp/output/desktop-es.json"));
}

/// Test that a stem ending in a word is not mistaken for a language tag
#[test]
fn test_generate_output_path_withoutLanguageSuffix_shouldAppendIt() {
    let output_path = FileManager::generate_output_path("strings.json", "out", "ar");
    assert_eq!(output_path, Path::new("out/strings-ar.json"));

    let output_path = FileManager::generate_output_path("labels-xx.json", "out", "ar");
    assert_eq!(output_path, Path::new("out/labels-xx-ar.json"));
}

/// Test that a missing extension defaults to json
#[test]
fn test_generate_output_path_withoutExtension_shouldUseJson() {
    let output_path = FileManager::generate_output_path("messages_en", "", "de");

    assert_eq!(output_path, Path::new("messages_de.json"));
}

/// Test that write_atomic creates missing directories
#[test]
fn test_write_atomic_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a").join("b").join("out.json");

    FileManager::write_atomic(&target, "{}\n")?;

    assert_eq!(fs::read_to_string(&target)?, "{}\n");
    Ok(())
}

/// Test that find_files only returns matching extensions
#[test]
fn test_find_files_withMixedFiles_shouldReturnOnlyJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "desktop-en.json", "{}")?;
    common::create_test_file(temp_dir.path(), "mobile/app-en.json", "{}")?;
    common::create_test_file(temp_dir.path(), "README.md", "")?;

    let files = FileManager::find_files(temp_dir.path(), "json")?;

    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.ends_with("mobile/app-en.json")));
    Ok(())
}
