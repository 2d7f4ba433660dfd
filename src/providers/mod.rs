/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - OpenAI: chat completions API
 * - Google: Google Translate web endpoint
 * - Mock: scripted in-process providers for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing real clients and mocks to be used interchangeably by the backends.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    ///
    /// # Arguments
    /// * `response` - The response from the provider
    ///
    /// # Returns
    /// * `String` - The extracted text
    fn extract_text(response: &Self::Response) -> String;
}

/// Map a non-success HTTP status to a provider error
pub(crate) fn error_for_status(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        429 => ProviderError::RateLimitExceeded(body),
        401 | 403 => ProviderError::AuthenticationError(body),
        code => ProviderError::ApiError {
            status_code: code,
            message: body,
        },
    }
}

pub mod google;
pub mod mock;
pub mod openai;
