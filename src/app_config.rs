use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ValidationError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language (English name or ISO code)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language (English name or ISO code)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Directory the translated output is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Document extraction config
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service selector
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceSelector {
    // @service: OpenAI chat completions (translate + revalidate)
    #[default]
    OpenAI,
    // @service: Google Translate web endpoint
    Google,
}

impl ServiceSelector {
    /// Every accepted service, in display order
    pub const ALL: [ServiceSelector; 2] = [Self::OpenAI, Self::Google];

    // @returns: Capitalized service name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Google => "Google Translate",
        }
    }

    // @returns: Lowercase service tag as accepted on input
    pub fn tag(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Google => "google",
        }
    }

    /// Render the accepted tags for messages, e.g. `[openai, google]`
    pub fn tag_list() -> String {
        let tags: Vec<&str> = Self::ALL.iter().map(|s| s.tag()).collect();
        format!("[{}]", tags.join(", "))
    }
}

impl std::fmt::Display for ServiceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for ServiceSelector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|service| service.tag() == s)
            .ok_or_else(|| ValidationError::InvalidServiceType(s.to_string()))
    }
}

/// OpenAI service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenAIConfig {
    /// Model name (e.g., "gpt-4", "gpt-3.5-turbo")
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API key for the service, falls back to `OPENAI_API_KEY`
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            model: default_openai_model(),
            api_key: String::new(),
            endpoint: default_openai_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OpenAIConfig {
    /// Get the API key, consulting the environment when the config leaves it empty
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("OPENAI_API_KEY").unwrap_or_default()
    }
}

/// Google Translate configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleConfig {
    /// Translate endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation service to use
    #[serde(default)]
    pub service: ServiceSelector,

    /// Maximum model-input tokens per chunk
    #[serde(default = "default_chunk_token_limit")]
    pub chunk_token_limit: usize,

    /// Maximum number of chunks in flight; `None` uses the service profile
    #[serde(default)]
    pub concurrent_requests: Option<usize>,

    /// Line written in place of a chunk the service could not translate
    #[serde(default)]
    pub missing_placeholder: String,

    /// OpenAI settings
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Google Translate settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            service: ServiceSelector::default(),
            chunk_token_limit: default_chunk_token_limit(),
            concurrent_requests: None,
            missing_placeholder: String::new(),
            openai: OpenAIConfig::default(),
            google: GoogleConfig::default(),
            common: TranslationCommonConfig::default(),
        }
    }
}

/// Common translation settings applicable to all services
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Instruction for the first LLM pass
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_translation_prompt")]
    pub translation_prompt: String,

    /// Instruction for the revalidation LLM pass
    /// Placeholders: {target_language}
    #[serde(default = "default_revalidation_prompt")]
    pub revalidation_prompt: String,

    /// Attempts made while the service reports rate limiting
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed delay between rate-limited attempts (in milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            translation_prompt: default_translation_prompt(),
            revalidation_prompt: default_revalidation_prompt(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            temperature: default_temperature(),
        }
    }
}

/// How PDF text is split into lines
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PdfGranularity {
    /// One entry per text line
    #[default]
    Line,
    /// One entry per page, inner line breaks replaced by spaces
    Page,
}

/// Document extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ExtractionConfig {
    /// Granularity used for PDF documents
    #[serde(default)]
    pub pdf_granularity: PdfGranularity,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "English".to_string()
}

fn default_target_language() -> String {
    "Hindi".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("translation_outputs")
}

fn default_chunk_token_limit() -> usize {
    500
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_translation_prompt() -> String {
    "Translate the following {source_language} text to {target_language}. Translation should flow well, \
     have high readability, should be medium complex. Each and every word should be translated. \
     Each sentence should be completed. Translate each question and all of their options. \
     Ordering should be properly maintained. Serial no of the questions should be correct and \
     properly displayed. Don't give the answer or skip any question. Only translate as instructed."
        .to_string()
}

fn default_revalidation_prompt() -> String {
    "Correct the translation text in {target_language} to make the flow better and more consistent \
     with theme of questions and options."
        .to_string()
}

impl Config {
    /// Load the configuration from a JSON file, writing the defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.translation.chunk_token_limit == 0 {
            return Err(anyhow!("chunk_token_limit must be greater than zero"));
        }

        if self.translation.concurrent_requests == Some(0) {
            return Err(anyhow!("concurrent_requests must be greater than zero"));
        }

        if self.translation.service == ServiceSelector::OpenAI
            && self.translation.openai.resolved_api_key().is_empty()
        {
            return Err(anyhow!(
                "Translation API key is required for OpenAI service (set it in the config or OPENAI_API_KEY)"
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            output_dir: default_output_dir(),
            translation: TranslationConfig::default(),
            extraction: ExtractionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Effective pool width for `service`
    pub fn optimal_concurrent_requests(&self, service: ServiceSelector) -> usize {
        crate::translation::concurrency::ServiceProfile::for_service(service)
            .effective_concurrent_requests(self.concurrent_requests)
    }

    /// Fill the translation prompt template
    pub fn translation_instruction(&self, source_language: &str, target_language: &str) -> String {
        self.common
            .translation_prompt
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }

    /// Fill the revalidation prompt template
    pub fn revalidation_instruction(&self, target_language: &str) -> String {
        self.common
            .revalidation_prompt
            .replace("{target_language}", target_language)
    }
}
