// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use yajtwai::app_config::{self, Config, TranslationProvider};
use yajtwai::app_controller::{Controller, RunSummary};
use yajtwai::translation::TranslationService;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    #[value(name = "lmstudio")]
    LMStudio,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate JSON localization files (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for yajtwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input JSON file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: TranslateOptions,
}

#[derive(Args, Debug)]
struct TranslateOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the selected provider
    #[arg(long, env = "YAJTWAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr'), or 'auto'
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code(s), comma separated (e.g., 'ar' or 'ar,es')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Write the translation to this file (single input file, single target language)
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write translations into this directory instead of next to the input
    #[arg(short = 'd', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Keep the source text for strings that fail instead of aborting
    #[arg(long)]
    best_effort: bool,

    /// Number of strings translated at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Check that the provider answers before translating
    #[arg(long)]
    check_connection: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// YAJTwAI - Yet Another JSON Translator with AI
///
/// Translates every string value of JSON localization files while keeping
/// keys, ordering and non-string values exactly as they are.
#[derive(Parser, Debug)]
#[command(name = "yajtwai")]
#[command(author = "YAJTwAI Team")]
#[command(version = "1.0.0")]
#[command(about = "JSON localization bundle translation tool")]
#[command(long_about = "YAJTwAI translates the string values of JSON localization files.

EXAMPLES:
    yajtwai desktop-en.json                        # Translate using default config
    yajtwai -t ar,es desktop-en.json               # Write desktop-ar.json and desktop-es.json
    yajtwai -t fr -o out/fr.json strings.json      # Explicit output file
    yajtwai -p ollama -m llama3.2:3b locales/      # Every *-en.json below locales/
    yajtwai --best-effort --concurrency 4 app-en.json
    yajtwai completions bash > yajtwai.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    google    - Google Cloud Translation v2 (GOOGLE_TRANSLATE_API_KEY)
    ollama    - Local Ollama server (default: llama3.2:3b)
    openai    - OpenAI API (OPENAI_API_KEY)
    anthropic - Anthropic Claude API (ANTHROPIC_API_KEY)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)
    mock      - Offline, prefixes every string with the target language")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input JSON file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself passes everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or command line says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yajtwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;
            run_translate(TranslateArgs {
                input_path,
                options: cli.options,
            })
            .await
        }
    }
}

/// Load the config file, creating it with defaults when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Override config values with the ones given on the command line
fn apply_overrides(config: &mut Config, options: &TranslateOptions) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(concurrency) = options.concurrency {
        config.translation.common.concurrent_leaves = concurrency;
    }
    if options.best_effort {
        config.translation.common.best_effort = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let options = &args.options;

    // Apply a command line log level before anything is logged
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_config(&options.config_path)?;
    apply_overrides(&mut config, options);
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    if options.check_connection {
        let service = TranslationService::new(config.translation.clone(), &config.source_language)?;
        service
            .test_connection()
            .await
            .map_err(|e| anyhow!("Failed to connect to {}: {}", config.translation.provider.display_name(), e))?;
        info!("Connected to {}", config.translation.provider.display_name());
    }

    let controller = Controller::with_config(config)?;
    let input_path = args.input_path.clone();

    let summary: RunSummary = if input_path.is_file() {
        match (&options.output, &options.output_dir) {
            (Some(output_file), _) => {
                controller
                    .run_to_file(input_path, output_file.clone(), options.force_overwrite)
                    .await?
            }
            (None, output_dir) => {
                let output_dir = output_dir
                    .clone()
                    .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new("")).to_path_buf());
                controller.run(input_path, output_dir, options.force_overwrite).await?
            }
        }
    } else if input_path.is_dir() {
        if options.output.is_some() || options.output_dir.is_some() {
            return Err(anyhow!("--output and --output-dir apply to a single input file only"));
        }
        controller.run_folder(input_path, options.force_overwrite).await?
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    };

    info!(
        "Done: {} file(s) written, {} skipped, {} strings translated",
        summary.written.len(),
        summary.skipped.len(),
        summary.strings_translated
    );

    Ok(())
}
