use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{error_for_status, Provider};
use crate::app_config::GoogleConfig;
use crate::errors::ProviderError;

/// Client for the Google Translate web endpoint (`translate_a/single`)
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL
    endpoint: String,
}

/// A single machine-translation request
#[derive(Debug, Clone, PartialEq)]
pub struct MachineTranslationRequest {
    /// Text to translate
    pub text: String,
    /// ISO 639 code of the source language
    pub source: String,
    /// ISO 639 code of the target language
    pub target: String,
}

impl MachineTranslationRequest {
    /// Create a new request
    pub fn new(text: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Result of a machine-translation request
#[derive(Debug, Clone, PartialEq)]
pub struct MachineTranslationResponse {
    /// Translated text
    pub text: String,
    /// Source language the service detected, when reported
    pub detected_source: Option<String>,
}

impl GoogleTranslate {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self::with_client(
            Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint,
        )
    }

    /// Create a client from the Google section of the configuration
    pub fn from_config(config: &GoogleConfig) -> Self {
        Self::new(config.endpoint.clone(), config.timeout_secs)
    }

    /// Create a client on top of an existing HTTP connection pool
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn request_url(&self, request: &MachineTranslationRequest) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))?;
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", &request.source)
            .append_pair("tl", &request.target)
            .append_pair("dt", "t");
        Ok(url)
    }

    /// Build the POST request; the text goes in the form body so long chunks
    /// are not limited by the URL length
    fn build_request(&self, request: &MachineTranslationRequest) -> Result<reqwest::Request, ProviderError> {
        let url = self.request_url(request)?;
        self.client
            .post(url)
            .form(&[("q", request.text.as_str())])
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build Google Translate request: {}", e)))
    }

    /// Pull the translated text out of the nested array payload
    ///
    /// The payload looks like `[[["translated", "original", ...], ...], null, "en", ...]`;
    /// the translation is the concatenation of the first element of every segment.
    pub fn parse_payload(payload: &Value) -> Result<MachineTranslationResponse, ProviderError> {
        let segments = payload
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Missing translation segments".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        let detected_source = payload.get(2).and_then(Value::as_str).map(str::to_string);

        Ok(MachineTranslationResponse { text, detected_source })
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = MachineTranslationRequest;
    type Response = MachineTranslationResponse;

    async fn complete(&self, request: MachineTranslationRequest) -> Result<MachineTranslationResponse, ProviderError> {
        let http_request = self.build_request(&request)?;
        let response = self.client.execute(http_request)
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send request to Google Translate: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google Translate error ({}): {}", status, error_text);
            return Err(error_for_status(status, error_text));
        }

        let payload: Value = response.json().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Google Translate response: {}", e)))?;
        Self::parse_payload(&payload)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(MachineTranslationRequest::new("Hello", "en", "fr")).await?;
        Ok(())
    }

    fn extract_text(response: &MachineTranslationResponse) -> String {
        response.text.clone()
    }
}
