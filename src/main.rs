// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::workflow::cancel::CancelSignal;
use crate::workflow::single::ItemOutcome;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod service;
mod workflow;

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
    /// Translate a single document
    Single {
        /// Source document (defaults to the sample source file)
        #[arg(value_name = "SOURCE")]
        source: Option<PathBuf>,

        /// Destination path (defaults next to the sample source)
        #[arg(value_name = "DESTINATION")]
        destination: Option<PathBuf>,
    },

    /// Translate every matching document under a directory
    Batch {
        /// Directory to scan for source documents
        #[arg(value_name = "SOURCE_DIR")]
        source_dir: PathBuf,

        /// Directory translated documents are written to
        #[arg(value_name = "TARGET_DIR")]
        target_dir: PathBuf,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// List the translation engines the service offers
    Engines,

    /// List the language directions the service supports
    Directions,

    /// Generate shell completions for doctrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// doctrans - asynchronous document translation
///
/// Submits documents to a remote translation service, tracks each job
/// until it finishes, and downloads the results. Batch mode processes a
/// whole directory, and one bad file never aborts the run.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(version = "1.0.0")]
#[command(about = "Asynchronous document translation tool")]
#[command(long_about = "doctrans submits documents to a remote translation service and retrieves \
the translated results once the service finishes them.

EXAMPLES:
    doctrans single report.docx report_fr.docx   # Translate one document
    doctrans single                              # Translate the sample document
    doctrans batch ./docs ./docs-fr              # Translate a whole directory
    doctrans batch -f ./docs ./docs-fr           # Re-translate existing outputs
    doctrans -t de batch ./docs ./docs-de        # Override the target language
    doctrans engines                             # Show available engines
    doctrans completions bash > doctrans.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Source language code (e.g., 'en', 'es'), or 'auto' to detect
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'fr', 'de')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// API key for the translation service
    #[arg(long, global = true, env = "DOCTRANS_API_KEY")]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }

    // @returns: Emoji for log level
    fn emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Map a configured log level to the log crate's filter
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Load the config file, creating a default one on first run
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        info!("No config file at {:?}, creating one with defaults", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.service.api_key = api_key.clone();
    }
    if let Some(cmd_log_level) = &options.log_level {
        config.log_level = cmd_log_level.clone().into();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "doctrans", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;

    // Ctrl-C trips the shared cancellation signal; in-flight waits
    // observe it instead of sleeping out their intervals.
    let cancel = CancelSignal::new();
    let interrupt_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling in-flight work");
            interrupt_cancel.cancel();
        }
    });

    match cli.command {
        Commands::Single {
            source,
            destination,
        } => {
            let outcome = controller.run_single(source, destination, &cancel).await?;
            if let ItemOutcome::Failure { reason, .. } = outcome {
                return Err(anyhow!("Translation failed: {}", reason));
            }
            Ok(())
        }
        Commands::Batch {
            source_dir,
            target_dir,
            force_overwrite,
        } => {
            controller
                .run_batch(source_dir, target_dir, force_overwrite, &cancel)
                .await?;
            Ok(())
        }
        Commands::Engines => {
            for engine in controller.list_engines().await? {
                println!("{}\t{}", engine.id, engine.name);
            }
            Ok(())
        }
        Commands::Directions => {
            for direction in controller.list_language_directions().await? {
                println!("{} -> {}", direction.source, direction.target);
            }
            Ok(())
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
