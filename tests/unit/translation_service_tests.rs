/*!
 * Tests for the translation service provider
 */

use std::sync::Arc;

use doctrans::app_config::{ServiceSelector, TranslationConfig};
use doctrans::errors::{TranslationError, ValidationError};
use doctrans::providers::mock::{MockBehavior, MockChatProvider, MockTranslateProvider};
use doctrans::translation::{ChunkPayload, TranslationBackend, TranslationResult, TranslationServiceProvider};

type MockService = TranslationServiceProvider<MockChatProvider, MockTranslateProvider>;

fn service(name: &str, chat: &MockChatProvider, mt: &MockTranslateProvider) -> MockService {
    let mut config = TranslationConfig::default();
    config.common.retry_delay_ms = 1;
    TranslationServiceProvider::with_clients(
        name,
        "English",
        "Hindi",
        Arc::new(config),
        Arc::new(chat.clone()),
        Arc::new(mt.clone()),
    )
}

#[test]
fn test_verifyServiceName_acceptedNames_shouldSelectVariant() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::working();

    assert_eq!(service("openai", &chat, &mt).verify_service_name(), Ok(ServiceSelector::OpenAI));
    assert_eq!(service("google", &chat, &mt).verify_service_name(), Ok(ServiceSelector::Google));
}

#[test]
fn test_verifyServiceName_otherNames_shouldFailWithMessage() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::working();

    for name in ["", "gpt", "Google", "openai ", "bing"] {
        let error = service(name, &chat, &mt).verify_service_name().unwrap_err();
        assert_eq!(error, ValidationError::InvalidServiceType(name.to_string()));
        assert!(error.to_string().starts_with("INVALID SERVICE TYPE PROVIDED"));
    }
}

#[test]
fn test_backend_shouldMatchService() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::working();
    let service = service("openai", &chat, &mt);

    assert!(matches!(service.backend(ServiceSelector::OpenAI), TranslationBackend::Llm(_)));
    assert!(matches!(
        service.backend(ServiceSelector::Google),
        TranslationBackend::MachineTranslation(_)
    ));
}

#[tokio::test]
async fn test_getTranslatedData_singletonSequence_shouldBeUnwrapped() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::working();

    let result = service("google", &chat, &mt)
        .get_translated_data(vec!["Hello".to_string()])
        .await
        .unwrap();

    assert_eq!(result, TranslationResult::Translated("[hi] Hello".to_string()));
}

#[tokio::test]
async fn test_getTranslatedData_multiElementSequence_shouldBeRejected() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::working();

    let error = service("google", &chat, &mt)
        .get_translated_data(ChunkPayload::Sequence(vec!["a".to_string(), "b".to_string()]))
        .await
        .unwrap_err();

    assert!(matches!(error, TranslationError::Validation(ValidationError::InvalidPayload(2))));
    assert_eq!(mt.request_count(), 0);
}

#[tokio::test]
async fn test_getTranslatedData_llm_shouldMakeTwoCallsPerChunk() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::working();

    let result = service("openai", &chat, &mt).get_translated_data("a, b").await.unwrap();

    assert_eq!(result.text(), Some("[TRANSLATED] a, b"));
    assert_eq!(chat.request_count(), 2);
    assert_eq!(mt.request_count(), 0);
}

#[tokio::test]
async fn test_getTranslatedData_mtFailure_shouldReturnMissing() {
    let chat = MockChatProvider::working();
    let mt = MockTranslateProvider::new(MockBehavior::Failing);

    let result = service("google", &chat, &mt).get_translated_data("Hello").await.unwrap();

    assert!(result.is_missing());
}

#[tokio::test]
async fn test_getTranslatedData_llmFailure_shouldPropagate() {
    let chat = MockChatProvider::new(MockBehavior::Failing);
    let mt = MockTranslateProvider::working();

    let result = service("openai", &chat, &mt).get_translated_data("Hello").await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
}

#[tokio::test]
async fn test_getTranslatedData_rateLimitedThenOk_shouldSucceed() {
    let chat = MockChatProvider::new(MockBehavior::RateLimited { times: 3 });
    let mt = MockTranslateProvider::working();

    let result = service("openai", &chat, &mt).get_translated_data("Hello").await.unwrap();

    assert_eq!(result.text(), Some("[TRANSLATED] Hello"));
    assert_eq!(chat.request_count(), 5);
}

#[tokio::test]
async fn test_getTranslatedData_rateLimitNeverClears_shouldExhaustRetries() {
    let chat = MockChatProvider::new(MockBehavior::AlwaysRateLimited);
    let mt = MockTranslateProvider::working();

    let result = service("openai", &chat, &mt).get_translated_data("Hello").await;

    assert!(matches!(result, Err(TranslationError::RetriesExhausted { attempts: 5, .. })));
    assert_eq!(chat.request_count(), 5);
}
