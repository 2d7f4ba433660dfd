/*!
 * Mock provider implementations for testing.
 *
 * Two mocks speak the same request/response types as the real clients:
 * - `MockChatProvider` stands in for the OpenAI chat client
 * - `MockTranslateProvider` stands in for the Google Translate client
 *
 * Both share a [`MockBehavior`] that scripts successes, failures, rate
 * limiting and latency, and both count requests and track peak concurrency.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::google::{MachineTranslationRequest, MachineTranslationResponse};
use crate::providers::openai::{OpenAIChoice, OpenAIMessage, OpenAIRequest, OpenAIResponse, TokenUsage};
use crate::providers::Provider;

/// Marker the mocks put in front of translated text
pub const TRANSLATED_MARKER: &str = "[TRANSLATED]";

/// Behavior mode for the mock providers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Answers the first `times` requests with a rate-limit error, then works
    RateLimited { times: usize },
    /// Always answers with a rate-limit error
    AlwaysRateLimited,
    /// Fails every request whose input contains `needle`
    FailOn { needle: &'static str },
    /// Returns empty response
    Empty,
    /// Simulates slow response
    Slow { delay_ms: u64 },
    /// Delays each request by a pseudo-random amount derived from its input
    Jitter { max_delay_ms: u64 },
}

/// State shared between clones of a mock
#[derive(Debug, Clone)]
struct MockState {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<String>>>,
}

/// Decrements the in-flight counter when the request finishes or is dropped
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockState {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Play the scripted behavior for one request
    ///
    /// Returns `Ok(true)` when the provider should answer with text and
    /// `Ok(false)` when it should answer empty.
    async fn run(&self, input: &str) -> Result<bool, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(input.to_string());
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        match self.behavior {
            MockBehavior::Working => Ok(true),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(true)
                }
            }
            MockBehavior::RateLimited { times } => {
                if count < times {
                    Err(ProviderError::RateLimitExceeded(format!("Simulated 429 (request #{})", count + 1)))
                } else {
                    Ok(true)
                }
            }
            MockBehavior::AlwaysRateLimited => {
                Err(ProviderError::RateLimitExceeded("Simulated 429".to_string()))
            }
            MockBehavior::FailOn { needle } => {
                if input.contains(needle) {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated failure for input containing {:?}", needle),
                        status_code: 500,
                    })
                } else {
                    Ok(true)
                }
            }
            MockBehavior::Empty => Ok(false),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(true)
            }
            MockBehavior::Jitter { max_delay_ms } => {
                let seed = input
                    .bytes()
                    .fold(17u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
                tokio::time::sleep(Duration::from_millis(seed % max_delay_ms.max(1))).await;
                Ok(true)
            }
        }
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.lock().map(|inputs| inputs.clone()).unwrap_or_default()
    }
}

/// Mock chat provider answering with `[TRANSLATED] <user text>`
///
/// Text already carrying the marker is returned unchanged, so a translate
/// pass followed by a revalidation pass yields a single marker.
#[derive(Debug, Clone)]
pub struct MockChatProvider {
    state: MockState,
    custom_response: Option<fn(&OpenAIRequest) -> String>,
}

impl MockChatProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            state: MockState::new(behavior),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&OpenAIRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Requests received so far, including failed ones
    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    /// User message of every request, in arrival order
    pub fn recorded_inputs(&self) -> Vec<String> {
        self.state.inputs()
    }

    fn default_response(request: &OpenAIRequest) -> String {
        let text = request.content_for("user").unwrap_or_default();
        if text.starts_with(TRANSLATED_MARKER) {
            text.to_string()
        } else {
            format!("{} {}", TRANSLATED_MARKER, text)
        }
    }
}

#[async_trait]
impl Provider for MockChatProvider {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let input = request.content_for("user").unwrap_or_default().to_string();
        if !self.state.run(&input).await? {
            return Ok(OpenAIResponse {
                choices: Vec::new(),
                usage: None,
            });
        }

        let content = match self.custom_response {
            Some(generator) => generator(&request),
            None => Self::default_response(&request),
        };
        let prompt_tokens = input.len() as u32;
        let completion_tokens = content.len() as u32;

        Ok(OpenAIResponse {
            choices: vec![OpenAIChoice {
                message: OpenAIMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.state.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        response.choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}

/// Mock machine-translation provider answering with `[<target>] <text>`
#[derive(Debug, Clone)]
pub struct MockTranslateProvider {
    state: MockState,
    custom_response: Option<fn(&MachineTranslationRequest) -> String>,
}

impl MockTranslateProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            state: MockState::new(behavior),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MachineTranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Requests received so far, including failed ones
    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed in flight at once
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Text of every request, in arrival order
    pub fn recorded_inputs(&self) -> Vec<String> {
        self.state.inputs()
    }
}

#[async_trait]
impl Provider for MockTranslateProvider {
    type Request = MachineTranslationRequest;
    type Response = MachineTranslationResponse;

    async fn complete(&self, request: MachineTranslationRequest) -> Result<MachineTranslationResponse, ProviderError> {
        let text = if self.state.run(&request.text).await? {
            match self.custom_response {
                Some(generator) => generator(&request),
                None => format!("[{}] {}", request.target, request.text),
            }
        } else {
            String::new()
        };

        Ok(MachineTranslationResponse {
            text,
            detected_source: Some(request.source.clone()),
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.state.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &MachineTranslationResponse) -> String {
        response.text.clone()
    }
}
