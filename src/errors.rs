/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::app_config::ServiceSelector;
use crate::file_utils::FileType;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether the error is the provider asking us to slow down
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimitExceeded(_))
    }
}

/// Input that was rejected before any expensive work started
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// File type tag outside the supported set
    #[error("INVALID FILE TYPE PROVIDED. PLEASE SELECT ANYTHING AMONG THESE : {}", FileType::tag_list())]
    InvalidFileType(String),

    /// Service name outside the supported set
    #[error("INVALID SERVICE TYPE PROVIDED. PLEASE SELECT ANYTHING AMONG THESE : {}", ServiceSelector::tag_list())]
    InvalidServiceType(String),

    /// Chunk payload was neither a plain string nor a single-element sequence
    #[error("Invalid chunk payload: expected a string or a single-element sequence, got {0} elements")]
    InvalidPayload(usize),
}

/// Errors raised while reading text out of a document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file could not be opened or read
    #[error("Failed to read {path}: {message}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error text
        message: String,
    },

    /// The PDF could not be parsed
    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),

    /// The Word document could not be parsed
    #[error("Failed to extract Word document text: {0}")]
    Word(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Rate limiting persisted through every retry
    #[error("Rate limit still exceeded after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// The last rate-limit error
        #[source]
        source: ProviderError,
    },

    /// The provider answered without any text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// The request was rejected before being sent
    #[error("Invalid translation input: {0}")]
    Validation(#[from] ValidationError),

    /// A language could not be mapped for the selected service
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// One chunk of a batch failed, aborting the batch
    #[error("Chunk {} failed: {source}", .index + 1)]
    ChunkFailed {
        /// Zero-based chunk position
        index: usize,
        /// What went wrong
        #[source]
        source: Box<TranslationError>,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Input validation failed
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Error from document extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
