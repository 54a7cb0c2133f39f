use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::{
    Completion, CompositeObserver, DocumentPipeline, FailurePolicy, LeafTranslator, LogObserver, ProgressObserver,
    TranslationPort, TranslationService, TreeWalker,
};

// @module: Application controller for JSON bundle translation

/// Totals over every document a controller run touched
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Target files written
    pub written: Vec<PathBuf>,
    /// Target files left alone because they already existed
    pub skipped: Vec<PathBuf>,
    /// Documents whose run failed
    pub failed: usize,
    /// Strings translated across all documents
    pub strings_translated: usize,
    /// Strings that kept their source text (best-effort runs)
    pub strings_kept: usize,
}

impl RunSummary {
    fn record(&mut self, completion: Completion) {
        self.strings_translated += completion.translated;
        self.strings_kept += completion.failures.len();
        self.written.push(completion.target_path);
    }

    fn merge(&mut self, other: RunSummary) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
        self.failed += other.failed;
        self.strings_translated += other.strings_translated;
        self.strings_kept += other.strings_kept;
    }
}

/// Main application controller for JSON translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Port override, used instead of the configured provider
    port: Option<Arc<dyn TranslationPort>>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config, port: None })
    }

    /// Translate through `port` instead of building a provider from the config
    pub fn with_port(mut self, port: Arc<dyn TranslationPort>) -> Self {
        self.port = Some(port);
        self
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Translate one file into every target language, next to `output_dir`
    ///
    /// Output names are derived from the input name. A failure for one
    /// language does not stop the others; the run reports an error at the
    /// end if any language failed.
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(&output_dir)?;

        let port = self.build_port()?;
        let multi_progress = MultiProgress::new();
        let mut summary = RunSummary::default();

        for target_language in self.config.target_languages() {
            let output_path = FileManager::generate_output_path(&input_file, &output_dir, &target_language);
            summary.merge(
                self.translate_file(&port, &input_file, &output_path, &target_language, &multi_progress, force_overwrite)
                    .await,
            );
        }

        Self::finish(summary)
    }

    /// Translate one file into an explicit target file
    ///
    /// Only valid with a single target language.
    pub async fn run_to_file(&self, input_file: PathBuf, output_file: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        let targets = self.config.target_languages();
        let [target_language] = targets.as_slice() else {
            return Err(anyhow!(
                "An explicit output file needs exactly one target language, got {}",
                targets.len()
            ));
        };

        let port = self.build_port()?;
        let multi_progress = MultiProgress::new();
        let summary = self
            .translate_file(&port, &input_file, &output_file, target_language, &multi_progress, force_overwrite)
            .await;

        Self::finish(summary)
    }

    /// Translate every source-language JSON file below `input_dir`
    ///
    /// A file is a source when its name carries the configured source
    /// language tag (`desktop-en.json` for `en`). Translations are written
    /// next to their source.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }
        if self.config.source_language.eq_ignore_ascii_case("auto") {
            return Err(anyhow!("Folder mode needs a concrete source language to pick source files"));
        }

        let source_files: Vec<PathBuf> = FileManager::find_files(&input_dir, "json")?
            .into_iter()
            .filter(|path| {
                FileManager::language_suffix(path)
                    .is_some_and(|tag| language_utils::language_codes_match(&tag, &self.config.source_language))
            })
            .collect();

        if source_files.is_empty() {
            return Err(anyhow!(
                "No '{}' JSON files found in directory: {:?}",
                self.config.source_language,
                input_dir
            ));
        }

        let port = self.build_port()?;
        let multi_progress = MultiProgress::new();
        let targets = self.config.target_languages();

        let folder_pb = multi_progress.add(ProgressBar::new((source_files.len() * targets.len()) as u64));
        folder_pb.set_style(progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut summary = RunSummary::default();
        for source_file in &source_files {
            let output_dir = source_file.parent().unwrap_or(input_dir.as_path()).to_path_buf();
            for target_language in &targets {
                folder_pb.set_message(format!(
                    "{} -> {}",
                    source_file.file_name().unwrap_or_default().to_string_lossy(),
                    target_language
                ));
                let output_path = FileManager::generate_output_path(source_file, &output_dir, target_language);
                summary.merge(
                    self.translate_file(&port, source_file, &output_path, target_language, &multi_progress, force_overwrite)
                        .await,
                );
                folder_pb.inc(1);
            }
        }
        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} written, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.written.len(),
            summary.skipped.len(),
            summary.failed
        );

        Self::finish(summary)
    }

    /// The port every document of this run goes through
    fn build_port(&self) -> Result<Arc<dyn TranslationPort>> {
        if let Some(port) = &self.port {
            return Ok(port.clone());
        }

        let service = TranslationService::new(self.config.translation.clone(), &self.config.source_language)
            .context("Failed to create translation service")?;
        info!(
            "{} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );
        Ok(Arc::new(service))
    }

    /// One document in one language; failures are logged and counted
    async fn translate_file(
        &self,
        port: &Arc<dyn TranslationPort>,
        input_file: &Path,
        output_path: &Path,
        target_language: &str,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        if language_utils::language_codes_match(&self.config.source_language, target_language) {
            warn!("Skipping {}: target language is the source language", target_language);
            return summary;
        }

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, translation already exists (use -f to force overwrite)",
                output_path
            );
            summary.skipped.push(output_path.to_path_buf());
            return summary;
        }

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(progress_style("strings"));
        progress_bar.set_message(target_language.to_string());

        let observer = CompositeObserver::new()
            .with(Arc::new(LogObserver))
            .with(Arc::new(ProgressObserver::new(progress_bar.clone())));
        let common = &self.config.translation.common;
        let policy = if common.best_effort {
            FailurePolicy::BestEffort
        } else {
            FailurePolicy::Abort
        };
        let walker = TreeWalker::new(LeafTranslator::new(port.clone()).with_observer(Arc::new(observer)))
            .with_concurrency(common.concurrent_leaves)
            .with_policy(policy);
        let pipeline = DocumentPipeline::new(walker)
            .with_indent(common.output_indent)
            .with_progress(progress_bar.clone());

        debug!("Translating {:?} -> {:?} ({})", input_file, output_path, target_language);
        match pipeline.run(input_file, output_path, target_language).await {
            Ok(completion) => {
                progress_bar.finish_and_clear();
                info!(
                    "Success: {:?} ({} strings in {})",
                    completion.target_path,
                    completion.translated,
                    Self::format_duration(completion.elapsed)
                );
                summary.record(completion);
            }
            Err(e) => {
                progress_bar.abandon();
                error!("Error translating {:?} to {}: {}", input_file, target_language, e);
                summary.failed += 1;
            }
        }

        summary
    }

    fn finish(summary: RunSummary) -> Result<RunSummary> {
        if summary.strings_kept > 0 {
            warn!("{} strings kept their source text", summary.strings_kept);
        }
        if summary.failed > 0 {
            return Err(anyhow!(
                "{} translation(s) failed, {} written",
                summary.failed,
                summary.written.len()
            ));
        }
        Ok(summary)
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

fn progress_style(unit: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        ))
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}
