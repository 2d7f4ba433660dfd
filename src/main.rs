// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use doctrans::app_config::{self, Config, ServiceSelector};
use doctrans::app_controller::Controller;

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
    /// Translate a document (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for doctrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input document (pdf, doc or docx)
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// File type tag; inferred from the extension when omitted
    #[arg(short, long)]
    file_type: Option<String>,

    /// Translation service to use (openai or google)
    #[arg(short = 'S', long)]
    service: Option<String>,

    /// Model name to use for the openai service
    #[arg(short, long)]
    model: Option<String>,

    /// Source language, as a name or ISO code (e.g. 'English', 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language, as a name or ISO code (e.g. 'Hindi', 'hi')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Maximum tokens per chunk
    #[arg(short = 'n', long)]
    chunk_size: Option<usize>,

    /// Maximum chunks in flight
    #[arg(short = 'j', long)]
    concurrent_requests: Option<usize>,

    /// Directory for the output file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Test the connection to the service before translating
    #[arg(long)]
    check: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// DocTrans - document translation with LLM and machine-translation services
///
/// Extracts the text of a PDF or Word document, splits it into token-bounded
/// chunks and translates the chunks concurrently.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(version)]
#[command(about = "Chunked document translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "DocTrans extracts text from PDF and Word documents and translates it chunk by chunk.

EXAMPLES:
    doctrans exam.pdf                              # Translate using default config
    doctrans -S google -t fr exam.docx             # Use Google Translate into French
    doctrans -f pdf -n 800 scan.bin                # Explicit file type, 800-token chunks
    doctrans -s English -t Hindi -j 8 exam.pdf     # Language names, 8 concurrent requests
    doctrans --check -S openai exam.pdf            # Test the service connection first
    doctrans completions bash > doctrans.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The OpenAI API key may also be supplied through
    the OPENAI_API_KEY environment variable.

SUPPORTED SERVICES:
    openai - OpenAI chat completions, translate then revalidate (requires API key)
    google - Google Translate web endpoint")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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

    // @returns: ANSI colour prefix for log level
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
        metadata.level() <= self.level
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
    // Logger starts at trace; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let input_file = options
        .input_file
        .clone()
        .ok_or_else(|| anyhow!("INPUT_FILE is required when no subcommand is specified"))?;

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Service names are checked before anything else touches the input
    let service_name = options
        .service
        .clone()
        .unwrap_or_else(|| config.translation.service.tag().to_string());
    let service = match service_name.parse::<ServiceSelector>() {
        Ok(service) => service,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    config.translation.service = service;

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    if options.check {
        controller.test_connection(service).await?;
    }
    match controller
        .run(&input_file, options.file_type.as_deref(), &service_name)
        .await
    {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            info!("Nothing to translate");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}

// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(model) = &options.model {
        config.translation.openai.model = model.clone();
    }
    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(chunk_size) = options.chunk_size {
        config.translation.chunk_token_limit = chunk_size;
    }
    if let Some(concurrent_requests) = options.concurrent_requests {
        config.translation.concurrent_requests = Some(concurrent_requests);
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
