/*!
 * Tests for provider request/response types and mocks
 */

use doctrans::errors::ProviderError;
use doctrans::providers::google::{GoogleTranslate, MachineTranslationRequest};
use doctrans::providers::mock::{MockBehavior, MockChatProvider, MockTranslateProvider};
use doctrans::providers::openai::{OpenAI, OpenAIRequest};
use doctrans::providers::Provider;
use serde_json::json;

#[test]
fn test_openaiRequest_builder_shouldKeepMessageOrder() {
    let request = OpenAIRequest::new("gpt-4")
        .add_message("system", "You translate")
        .add_message("user", "Hello")
        .temperature(0.3);

    assert_eq!(request.model(), "gpt-4");
    assert_eq!(request.messages().len(), 2);
    assert_eq!(request.content_for("system"), Some("You translate"));
    assert_eq!(request.content_for("user"), Some("Hello"));
    assert_eq!(request.content_for("assistant"), None);

    let json = serde_json::to_value(&request).unwrap();
    assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
}

#[test]
fn test_googlePayload_emptySegments_shouldGiveEmptyText() {
    let response = GoogleTranslate::parse_payload(&json!([[], null, "en"])).unwrap();
    assert_eq!(response.text, "");
}

#[tokio::test]
async fn test_mockChatProvider_shouldTrackPeakConcurrency() {
    let provider = MockChatProvider::new(MockBehavior::Slow { delay_ms: 20 });

    let first = provider.complete(OpenAIRequest::new("m").add_message("user", "a"));
    let second = provider.complete(OpenAIRequest::new("m").add_message("user", "b"));
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(provider.peak_in_flight(), 2);
}

#[tokio::test]
async fn test_mockTranslateProvider_shouldRecordInputs() {
    let provider = MockTranslateProvider::working();

    provider.complete(MachineTranslationRequest::new("one", "en", "hi")).await.unwrap();
    provider.complete(MachineTranslationRequest::new("two", "en", "hi")).await.unwrap();

    assert_eq!(provider.recorded_inputs(), vec!["one".to_string(), "two".to_string()]);
}

#[tokio::test]
async fn test_mockProviders_testConnection_shouldFollowBehavior() {
    assert!(MockChatProvider::working().test_connection().await.is_ok());
    assert!(matches!(
        MockTranslateProvider::failing().test_connection().await,
        Err(ProviderError::ConnectionError(_))
    ));
}

#[tokio::test]
async fn test_openaiClient_unreachableEndpoint_shouldBeConnectionError() {
    let client = OpenAI::new("key", "http://127.0.0.1:9/v1", "gpt-3.5-turbo", 2);

    let result = client.complete(OpenAIRequest::new("gpt-3.5-turbo").add_message("user", "Hi")).await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}

#[tokio::test]
async fn test_googleClient_invalidEndpoint_shouldFailBeforeSending() {
    let client = GoogleTranslate::new("not a url", 2);

    let result = client.complete(MachineTranslationRequest::new("Hi", "en", "hi")).await;

    assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
}
