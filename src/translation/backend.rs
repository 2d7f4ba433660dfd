/*!
 * Translation backends.
 *
 * A backend turns one chunk of source text into a [`TranslationResult`].
 * Two families exist:
 *
 * - `LlmTranslator`: a chat model asked to translate, then asked again to
 *   revalidate its own output. Rate limiting is retried; any other failure
 *   is returned to the caller.
 * - `MachineTranslator`: a machine-translation endpoint. Failures are logged
 *   and turned into [`TranslationResult::Missing`], never returned.
 *
 * [`TranslationBackend`] is the closed set of the two and is what the
 * dispatcher builds per chunk.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::google::{GoogleTranslate, MachineTranslationRequest, MachineTranslationResponse};
use crate::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use crate::providers::Provider;

use super::chunker::CHUNK_SEPARATOR;

/// One chunk to translate, with its language pair
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Source language as configured (name or code)
    pub source_language: String,
    /// Target language as configured (name or code)
    pub target_language: String,
    /// Chunk text
    pub text: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_language: source_language.into(),
            target_language: target_language.into(),
            text: text.into(),
        }
    }
}

/// Outcome of translating one chunk
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationResult {
    /// Translated text
    Translated(String),
    /// The service produced nothing for this chunk
    Missing {
        /// Why the chunk has no translation
        reason: String,
    },
}

impl TranslationResult {
    /// Translated text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Translated(text) => Some(text),
            Self::Missing { .. } => None,
        }
    }

    /// Whether the chunk has no translation
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }

    /// Text to write out, substituting `placeholder` for a missing chunk
    pub fn output_line<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.text().unwrap_or(placeholder)
    }
}

/// Capability shared by every backend
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate one chunk
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslationError>;
}

/// Retry schedule applied while the service reports rate limiting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Build the policy from the common translation settings
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            max_attempts: config.common.retry_count.max(1),
            delay: Duration::from_millis(config.common.retry_delay_ms),
        }
    }
}

/// Chat-model backend: translate, then revalidate
#[derive(Debug)]
pub struct LlmTranslator<P = OpenAI> {
    client: Arc<P>,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
    config: Arc<TranslationConfig>,
}

impl<P> LlmTranslator<P> {
    /// Create a translator sharing `client`
    pub fn new(client: Arc<P>, config: Arc<TranslationConfig>) -> Self {
        Self {
            model: config.openai.model.clone(),
            temperature: config.common.temperature,
            retry: RetryPolicy::from_config(&config),
            client,
            config,
        }
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl<P> LlmTranslator<P>
where
    P: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
{
    /// Run one chat turn, retrying while rate limited
    async fn chat(&self, instruction: &str, text: &str) -> Result<String, TranslationError> {
        let request = OpenAIRequest::new(self.model.clone())
            .add_message("system", instruction)
            .add_message("user", text)
            .temperature(self.temperature);

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            match self.client.complete(request.clone()).await {
                Ok(response) => break response,
                Err(e) if e.is_rate_limit() => {
                    if attempt >= self.retry.max_attempts {
                        return Err(TranslationError::RetriesExhausted { attempts: attempt, source: e });
                    }
                    warn!(
                        "Rate limited (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.retry.max_attempts, self.retry.delay, e
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => return Err(TranslationError::Provider(e)),
            }
        };

        if let Some(choice) = response.choices.first() {
            debug!("Chat finish_reason: {:?}", choice.finish_reason);
        }
        if let Some(usage) = &response.usage {
            debug!(
                "Token usage: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        if response.choices.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(P::extract_text(&response))
    }
}

#[async_trait]
impl<P> Translate for LlmTranslator<P>
where
    P: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
{
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslationError> {
        if is_blank(&request.text) {
            return Ok(TranslationResult::Translated(String::new()));
        }

        // Prompts read better with names; unknown values go through as given
        let source = language_utils::get_language_name(&request.source_language)
            .unwrap_or_else(|_| request.source_language.clone());
        let target = language_utils::get_language_name(&request.target_language)
            .unwrap_or_else(|_| request.target_language.clone());

        let draft = self
            .chat(&self.config.translation_instruction(&source, &target), &request.text)
            .await?;
        let revised = self
            .chat(&self.config.revalidation_instruction(&target), &draft)
            .await?;

        Ok(TranslationResult::Translated(revised))
    }
}

/// Machine-translation backend
#[derive(Debug)]
pub struct MachineTranslator<M = GoogleTranslate> {
    client: Arc<M>,
}

impl<M> MachineTranslator<M> {
    /// Create a translator sharing `client`
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }
}

impl<M> MachineTranslator<M>
where
    M: Provider<Request = MachineTranslationRequest, Response = MachineTranslationResponse>,
{
    async fn try_translate(&self, request: &TranslationRequest) -> Result<String, TranslationError> {
        let source = language_utils::to_service_code(&request.source_language)
            .map_err(|e| TranslationError::UnsupportedLanguage(e.to_string()))?;
        let target = language_utils::to_service_code(&request.target_language)
            .map_err(|e| TranslationError::UnsupportedLanguage(e.to_string()))?;

        let response = self
            .client
            .complete(MachineTranslationRequest::new(request.text.clone(), source, target))
            .await?;
        if let Some(detected) = &response.detected_source {
            debug!("Detected source language: {}", detected);
        }
        Ok(M::extract_text(&response))
    }
}

#[async_trait]
impl<M> Translate for MachineTranslator<M>
where
    M: Provider<Request = MachineTranslationRequest, Response = MachineTranslationResponse>,
{
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslationError> {
        if is_blank(&request.text) {
            return Ok(TranslationResult::Translated(String::new()));
        }

        match self.try_translate(request).await {
            Ok(text) => Ok(TranslationResult::Translated(text)),
            Err(e) => {
                warn!("Unable to provide required output: {}", e);
                Ok(TranslationResult::Missing { reason: e.to_string() })
            }
        }
    }
}

/// The closed set of backends a chunk can be sent to
#[derive(Debug)]
pub enum TranslationBackend<L = OpenAI, M = GoogleTranslate> {
    /// Chat model with a revalidation pass
    Llm(LlmTranslator<L>),
    /// Machine-translation endpoint
    MachineTranslation(MachineTranslator<M>),
}

#[async_trait]
impl<L, M> Translate for TranslationBackend<L, M>
where
    L: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
    M: Provider<Request = MachineTranslationRequest, Response = MachineTranslationResponse>,
{
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult, TranslationError> {
        match self {
            Self::Llm(backend) => backend.translate(request).await,
            Self::MachineTranslation(backend) => backend.translate(request).await,
        }
    }
}

/// Whether a chunk is only empty or whitespace lines joined together
fn is_blank(text: &str) -> bool {
    text.split(CHUNK_SEPARATOR).all(|line| line.trim().is_empty())
}

/// True when the error came from rate limiting that never cleared
pub fn is_exhausted_rate_limit(error: &TranslationError) -> bool {
    matches!(
        error,
        TranslationError::RetriesExhausted { source: ProviderError::RateLimitExceeded(_), .. }
    )
}
