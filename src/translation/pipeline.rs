/*!
 * End-to-end translation of one JSON document.
 *
 * A run loads the source file, walks it with a [`TreeWalker`], renders the
 * result and atomically writes it to the target path:
 *
 * `Loading -> Walking -> Serializing -> Persisted`, or `Failed` from any
 * step. The target file is only touched in the last step, so a failed run
 * leaves whatever was there before.
 */

use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::translation::document::{DEFAULT_INDENT, Document, DocumentState};
use crate::translation::walker::{LeafFailure, TreeWalker, count_translatable};

/// Result of a successful run
#[derive(Debug)]
pub struct Completion {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub target_language: String,

    /// String leaves that were translated
    pub translated: usize,

    /// Empty strings copied as they were
    pub skipped_empty: usize,

    /// Numbers, booleans and nulls
    pub passed_through: usize,

    /// Leaves kept in the source language (best-effort runs only)
    pub failures: Vec<LeafFailure>,

    /// Wall time of the run
    pub elapsed: Duration,

    /// Size of the written file
    pub bytes_written: usize,
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Translates a document from a source file into a target file
pub struct DocumentPipeline {
    walker: TreeWalker,
    indent: usize,
    progress: Option<ProgressBar>,
}

impl DocumentPipeline {
    pub fn new(walker: TreeWalker) -> Self {
        Self {
            walker,
            indent: DEFAULT_INDENT,
            progress: None,
        }
    }

    /// Indentation width of the written document
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Size `bar` to the number of strings once the source is loaded
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Translate `source_path` into `target_language` and write `target_path`
    pub async fn run(
        &self,
        source_path: &Path,
        target_path: &Path,
        target_language: &str,
    ) -> Result<Completion, PipelineError> {
        validate_run(source_path, target_path, target_language)?;

        let start_time = Instant::now();
        let mut document = Document::new(source_path, target_path);

        match self.execute(&mut document, target_language).await {
            Ok(mut completion) => {
                completion.elapsed = start_time.elapsed();
                info!(
                    "Translated {} -> {} ({} strings, {} bytes) in {:.2}s",
                    source_path.display(),
                    target_path.display(),
                    completion.translated,
                    completion.bytes_written,
                    completion.elapsed.as_secs_f64()
                );
                Ok(completion)
            }
            Err(e) => {
                let failed_in = document.state();
                document.fail();
                warn!("Run for {} failed while {}: {}", source_path.display(), failed_in, e);
                Err(e)
            }
        }
    }

    async fn execute(&self, document: &mut Document, target_language: &str) -> Result<Completion, PipelineError> {
        document.load()?;
        debug!("Loaded {}", document.source_path.display());
        if let Some(bar) = &self.progress {
            bar.set_length(count_translatable(&document.root) as u64);
        }

        document.advance(DocumentState::Walking);
        let stats = self.walker.translate_in_place(&mut document.root, target_language).await?;

        document.advance(DocumentState::Serializing);
        let rendered = document.render(self.indent)?;

        FileManager::write_atomic(&document.target_path, &rendered).map_err(|e| PipelineError::WriteFailure {
            path: document.target_path.clone(),
            detail: format!("{:#}", e),
        })?;
        document.advance(DocumentState::Persisted);

        if !stats.failures.is_empty() {
            warn!(
                "{} of {} strings in {} kept their source text",
                stats.failures.len(),
                stats.failures.len() + stats.translated,
                document.target_path.display()
            );
        }

        Ok(Completion {
            source_path: document.source_path.clone(),
            target_path: document.target_path.clone(),
            target_language: target_language.to_string(),
            translated: stats.translated,
            skipped_empty: stats.skipped_empty,
            passed_through: stats.passed_through,
            failures: stats.failures,
            elapsed: Duration::ZERO,
            bytes_written: rendered.len(),
        })
    }
}

fn validate_run(source_path: &Path, target_path: &Path, target_language: &str) -> Result<(), PipelineError> {
    if source_path.as_os_str().is_empty() {
        return Err(PipelineError::InvalidConfig("source path is empty".to_string()));
    }
    if target_path.as_os_str().is_empty() {
        return Err(PipelineError::InvalidConfig("target path is empty".to_string()));
    }
    if target_language.trim().is_empty() {
        return Err(PipelineError::InvalidConfig("target language is empty".to_string()));
    }
    if source_path == target_path {
        return Err(PipelineError::InvalidConfig(format!(
            "target path must differ from source path: {}",
            source_path.display()
        )));
    }
    Ok(())
}
