/*!
 * Core translation service implementation.
 *
 * This module contains [`TranslationServiceProvider`], which validates the
 * requested service name, normalizes chunk payloads and routes each chunk to
 * a freshly built backend sharing the long-lived clients.
 */

use std::sync::Arc;

use crate::app_config::{ServiceSelector, TranslationConfig};
use crate::errors::{TranslationError, ValidationError};
use crate::providers::google::{GoogleTranslate, MachineTranslationRequest, MachineTranslationResponse};
use crate::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use crate::providers::Provider;

use super::backend::{
    LlmTranslator, MachineTranslator, Translate, TranslationBackend, TranslationRequest, TranslationResult,
};

/// Chunk input as handed to the service
///
/// A chunk is normally plain text; a sequence is accepted when it holds
/// exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkPayload {
    /// Plain text
    Text(String),
    /// Sequence wrapper around the text
    Sequence(Vec<String>),
}

impl From<String> for ChunkPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ChunkPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for ChunkPayload {
    fn from(items: Vec<String>) -> Self {
        Self::Sequence(items)
    }
}

/// Routes chunks to the backend of the requested service
#[derive(Debug)]
pub struct TranslationServiceProvider<L = OpenAI, M = GoogleTranslate> {
    service_name: String,
    source_language: String,
    target_language: String,
    config: Arc<TranslationConfig>,
    llm_client: Arc<L>,
    mt_client: Arc<M>,
}

impl<L, M> TranslationServiceProvider<L, M> {
    /// Create a service provider on top of existing clients
    pub fn with_clients(
        service_name: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        config: Arc<TranslationConfig>,
        llm_client: Arc<L>,
        mt_client: Arc<M>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            config,
            llm_client,
            mt_client,
        }
    }

    /// Service name as requested
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Source language as configured
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Target language as configured
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Translation settings shared by every backend
    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    /// Check the requested service name against the supported set
    pub fn verify_service_name(&self) -> Result<ServiceSelector, ValidationError> {
        self.service_name.parse()
    }

    /// Normalize a chunk payload to the text sent to the backend
    pub fn format_input_text(input: ChunkPayload) -> Result<String, ValidationError> {
        match input {
            ChunkPayload::Text(text) => Ok(text),
            ChunkPayload::Sequence(items) if items.len() == 1 => {
                Ok(items.into_iter().next().unwrap_or_default())
            }
            ChunkPayload::Sequence(items) => Err(ValidationError::InvalidPayload(items.len())),
        }
    }

    /// Build the backend for `service`, sharing this provider's clients
    pub fn backend(&self, service: ServiceSelector) -> TranslationBackend<L, M> {
        match service {
            ServiceSelector::OpenAI => TranslationBackend::Llm(LlmTranslator::new(
                Arc::clone(&self.llm_client),
                Arc::clone(&self.config),
            )),
            ServiceSelector::Google => {
                TranslationBackend::MachineTranslation(MachineTranslator::new(Arc::clone(&self.mt_client)))
            }
        }
    }
}

impl<L, M> TranslationServiceProvider<L, M>
where
    L: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
    M: Provider<Request = MachineTranslationRequest, Response = MachineTranslationResponse>,
{
    /// Translate one chunk with the requested service
    pub async fn get_translated_data(
        &self,
        input: impl Into<ChunkPayload>,
    ) -> Result<TranslationResult, TranslationError> {
        let service = self.verify_service_name()?;
        let text = Self::format_input_text(input.into())?;
        let request = TranslationRequest::new(self.source_language.clone(), self.target_language.clone(), text);

        self.backend(service).translate(&request).await
    }
}
