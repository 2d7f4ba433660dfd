use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, ServiceSelector};
use crate::document_processor::DocumentExtractor;
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::providers::google::{GoogleTranslate, MachineTranslationRequest, MachineTranslationResponse};
use crate::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use crate::providers::Provider;
use crate::tokenizer::{TiktokenCounter, TokenCounter};
use crate::translation::concurrency::ServiceProfile;
use crate::translation::{chunk_lines, BatchTranslator, TranslationResult, TranslationServiceProvider};

// @module: Application controller for document translation

/// Results of translating one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTranslation {
    /// Service the chunks were sent to
    pub service: ServiceSelector,
    /// One result per chunk, in document order
    pub results: Vec<TranslationResult>,
}

impl DocumentTranslation {
    /// Number of chunks the service could not translate
    pub fn missing_count(&self) -> usize {
        self.results.iter().filter(|result| result.is_missing()).count()
    }
}

/// Main application controller for document translation
pub struct Controller<L = OpenAI, M = GoogleTranslate> {
    // @field: App configuration
    config: Config,
    // @field: Token counter used for chunk sizing
    token_counter: Arc<dyn TokenCounter>,
    // @field: Chat client shared by every chunk
    llm_client: Arc<L>,
    // @field: Machine-translation client shared by every chunk
    mt_client: Arc<M>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let model = &config.translation.openai.model;
        let token_counter = match TiktokenCounter::for_model(model) {
            Ok(counter) => counter,
            Err(e) => {
                warn!("{}; falling back to cl100k_base", e);
                TiktokenCounter::cl100k()?
            }
        };
        debug!("Counting tokens with the {} encoding", token_counter.model());

        let llm_client = OpenAI::from_config(&config.translation.openai);
        let mt_client = GoogleTranslate::from_config(&config.translation.google);

        Ok(Self::with_parts(
            config,
            Arc::new(token_counter),
            Arc::new(llm_client),
            Arc::new(mt_client),
        ))
    }
}

impl<L, M> Controller<L, M>
where
    L: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
    M: Provider<Request = MachineTranslationRequest, Response = MachineTranslationResponse>,
{
    /// Create a controller from already-built parts
    pub fn with_parts(config: Config, token_counter: Arc<dyn TokenCounter>, llm_client: Arc<L>, mt_client: Arc<M>) -> Self {
        Self {
            config,
            token_counter,
            llm_client,
            mt_client,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a minimal request to the client behind `service`
    pub async fn test_connection(&self, service: ServiceSelector) -> Result<(), AppError> {
        let result = match service {
            ServiceSelector::OpenAI => self.llm_client.test_connection().await,
            ServiceSelector::Google => self.mt_client.test_connection().await,
        };

        match result {
            Ok(()) => {
                info!("{} connection OK", service.display_name());
                Ok(())
            }
            Err(e) => {
                error!("{} connection failed: {}", service.display_name(), e);
                Err(e.into())
            }
        }
    }

    /// Translate a document and write the output file
    ///
    /// Returns the output path, or `None` when the document produced no
    /// chunks and nothing was written.
    pub async fn run(&self, input_file: &Path, file_type: Option<&str>, service_name: &str) -> Result<Option<PathBuf>, AppError> {
        let start_time = Instant::now();
        let translation = self.translate_document(input_file, file_type, service_name).await?;

        if translation.results.is_empty() {
            warn!("No text extracted from {}; nothing to write", input_file.display());
            return Ok(None);
        }

        let output_path = self.save_translation(&translation)?;
        info!("Success: {}", output_path.display());
        info!("Total time: {}", Self::format_duration(start_time.elapsed()));

        Ok(Some(output_path))
    }

    /// Validate inputs, extract, chunk and translate a document
    ///
    /// File type and service name are checked before the file is read, and
    /// extraction completes before any translation call is made.
    pub async fn translate_document(&self, input_file: &Path, file_type: Option<&str>, service_name: &str) -> Result<DocumentTranslation, AppError> {
        let file_type = match file_type {
            Some(tag) => tag.parse::<FileType>()?,
            None => FileType::from_path(input_file)?,
        };

        let provider = TranslationServiceProvider::with_clients(
            service_name,
            self.config.source_language.clone(),
            self.config.target_language.clone(),
            Arc::new(self.config.translation.clone()),
            Arc::clone(&self.llm_client),
            Arc::clone(&self.mt_client),
        );
        let service = provider.verify_service_name()?;

        if language_utils::language_codes_match(&self.config.source_language, &self.config.target_language) {
            warn!("Source and target language are the same ({}); translating anyway", self.config.target_language);
        }

        info!("🚀 DocTrans: {} ({}) - {} -> {}",
            input_file.display(),
            file_type,
            self.config.source_language,
            self.config.target_language);

        let extraction_start = Instant::now();
        let lines = self.extract_lines(input_file, file_type).await?;
        info!("Extracted {} lines in {}", lines.len(), Self::format_duration(extraction_start.elapsed()));

        let chunk_token_limit = self.config.translation.chunk_token_limit;
        let chunks = chunk_lines(&lines, chunk_token_limit, &*self.token_counter);

        let profile = ServiceProfile::for_service(service);
        let width = self.config.translation.optimal_concurrent_requests(service);
        info!("Translating with {} ({} concurrent requests, chunks of at most {} tokens)",
            service.display_name(), width, chunk_token_limit);
        if profile.failures_abort_batch {
            debug!("A failed chunk aborts the run");
        } else {
            debug!("Failed chunks are written as placeholders");
        }

        let progress_bar = Self::chunk_spinner();
        let translation_start = Instant::now();
        let batch = BatchTranslator::new(&provider, width);
        let result = batch
            .translate_chunks(chunks, |completed| progress_bar.set_position(completed as u64))
            .await;

        match &result {
            Ok(results) => progress_bar.finish_with_message(format!("{} chunks translated", results.len())),
            Err(_) => progress_bar.abandon_with_message("translation aborted"),
        }
        let results = result?;

        info!("Took {} to translate {} chunks", Self::format_duration(translation_start.elapsed()), results.len());

        let translation = DocumentTranslation { service, results };
        let missing = translation.missing_count();
        if missing > 0 {
            warn!("{} of {} chunks have no translation", missing, translation.results.len());
        }

        Ok(translation)
    }

    /// Write one line per chunk result to the output file
    pub fn save_translation(&self, translation: &DocumentTranslation) -> Result<PathBuf, AppError> {
        let output_path = FileManager::generate_output_path(
            &self.config.output_dir,
            translation.service.tag(),
            self.config.translation.chunk_token_limit,
        );

        let placeholder = self.config.translation.missing_placeholder.as_str();
        let lines: Vec<&str> = translation
            .results
            .iter()
            .map(|result| result.output_line(placeholder))
            .collect();

        FileManager::write_lines(&output_path, &lines)?;
        Ok(output_path)
    }

    /// Run extraction off the async workers
    async fn extract_lines(&self, input_file: &Path, file_type: FileType) -> Result<Vec<String>, AppError> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file not found: {}", input_file.display())));
        }

        let extractor = DocumentExtractor::new(input_file, file_type, self.config.extraction.pdf_granularity);
        let lines = tokio::task::spawn_blocking(move || extractor.extract_lines())
            .await
            .map_err(|e| AppError::Unknown(format!("Extraction task failed: {}", e)))??;
        Ok(lines)
    }

    fn chunk_spinner() -> ProgressBar {
        let progress_bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} chunks translated {msg}")
            .or_else(|_| ProgressStyle::default_spinner().template("{spinner} [{elapsed_precise}] {pos} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress_bar.set_style(style);
        progress_bar.enable_steady_tick(Duration::from_millis(120));
        progress_bar
    }

    // Format duration in a human-readable format (HH:MM:SS)
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
