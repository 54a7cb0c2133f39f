use anyhow::{Result, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and path utilities

/// Trailing language tag with a region or script subtag: `app_pt-BR`, `ui-zh-Hant`, `es-419`
static REGIONAL_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>.+)(?P<sep>[-._])(?P<lang>[a-zA-Z]{2}[-_](?:[A-Z]{2}|[0-9]{3}|[A-Z][a-z]{3}))$").unwrap()
});

/// Trailing bare language tag: `desktop-en`, `messages.en`
static LANGUAGE_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<base>.+)(?P<sep>[-._])(?P<lang>[a-zA-Z]{2})$").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Files with the given extension below `dir`, sorted
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(extension) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Language tag at the end of a file stem, if any (`desktop-en.json` -> `en`)
    pub fn language_suffix<P: AsRef<Path>>(path: P) -> Option<String> {
        let stem = path.as_ref().file_stem()?.to_string_lossy().to_string();
        split_language_suffix(&stem).map(|(_, _, tag)| tag)
    }

    /// Derive the translated file's path from the source path
    ///
    /// A trailing language tag in the file stem is replaced when it starts with
    /// a known two-letter language code (`desktop-en.json` -> `desktop-ar.json`,
    /// `messages.en.json` -> `messages.ar.json`, `web-ui-en.json` ->
    /// `web-ui-ar.json`); otherwise `-<lang>` is appended to the stem.
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy().to_string();
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "json".to_string());

        let translated_stem = match split_language_suffix(&stem) {
            Some((base, sep, _)) => format!("{}{}{}", base, sep, target_language),
            None => format!("{}-{}", stem, target_language),
        };

        output_dir.as_ref().join(format!("{}.{}", translated_stem, extension))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Replace `path` with `content` in one step
    ///
    /// The content goes to a temporary file in the same directory, is synced,
    /// then renamed over the target. Readers see either the old file or the
    /// complete new one.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.as_file().sync_all()
            .with_context(|| format!("Failed to sync temporary file for {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to move translated file into place: {:?}", path))?;

        Ok(())
    }
}

/// Split `stem` into base, separator and a trailing known language tag
///
/// The regional form is tried first so `app_pt-BR` keeps its region; a
/// lowercase pair such as `de-en` is never read as language plus region.
fn split_language_suffix(stem: &str) -> Option<(String, String, String)> {
    [&*REGIONAL_SUFFIX_REGEX, &*LANGUAGE_SUFFIX_REGEX].into_iter().find_map(|regex| {
        let caps = regex.captures(stem)?;
        let tag = &caps["lang"];
        is_language_tag(tag).then(|| (caps["base"].to_string(), caps["sep"].to_string(), tag.to_string()))
    })
}

fn is_language_tag(tag: &str) -> bool {
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    crate::language_utils::validate_language_code(primary).is_ok()
}
