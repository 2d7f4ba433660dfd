/*!
 * Tests for error types and conversions
 */

use doctrans::errors::{AppError, ExtractionError, ProviderError, TranslationError, ValidationError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 500,
        message: "Internal error".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal error"));
}

#[test]
fn test_providerError_rateLimitExceeded_shouldBeRecognised() {
    let error = ProviderError::RateLimitExceeded("Retry after 60s".to_string());
    assert!(error.is_rate_limit());
    assert!(format!("{}", error).contains("Rate limit exceeded"));
    assert!(!ProviderError::ConnectionError("down".to_string()).is_rate_limit());
}

#[test]
fn test_validationError_invalidFileType_shouldListAcceptedTypes() {
    let error = ValidationError::InvalidFileType("txt".to_string());
    assert_eq!(
        error.to_string(),
        "INVALID FILE TYPE PROVIDED. PLEASE SELECT ANYTHING AMONG THESE : [pdf, doc, docx]"
    );
}

#[test]
fn test_validationError_invalidServiceType_shouldListAcceptedServices() {
    let error = ValidationError::InvalidServiceType("deepl".to_string());
    assert_eq!(
        error.to_string(),
        "INVALID SERVICE TYPE PROVIDED. PLEASE SELECT ANYTHING AMONG THESE : [openai, google]"
    );
}

#[test]
fn test_translationError_fromProviderError_shouldWrapCorrectly() {
    let provider_error = ProviderError::RequestFailed("Test error".to_string());
    let translation_error: TranslationError = provider_error.into();

    match translation_error {
        TranslationError::Provider(inner) => assert!(inner.to_string().contains("Test error")),
        other => panic!("Expected Provider variant, got {:?}", other),
    }
}

#[test]
fn test_translationError_retriesExhausted_shouldReportAttempts() {
    let error = TranslationError::RetriesExhausted {
        attempts: 5,
        source: ProviderError::RateLimitExceeded("slow down".to_string()),
    };
    let display = error.to_string();
    assert!(display.contains("5 attempts"));
    assert!(display.contains("slow down"));
}

#[test]
fn test_translationError_chunkFailed_shouldUseOneBasedIndex() {
    let error = TranslationError::ChunkFailed {
        index: 2,
        source: Box::new(TranslationError::EmptyResponse),
    };
    assert!(error.to_string().starts_with("Chunk 3 failed"));
}

#[test]
fn test_appError_fromValidationError_shouldKeepMessage() {
    let app_error: AppError = ValidationError::InvalidFileType("txt".to_string()).into();
    assert!(matches!(app_error, AppError::Validation(_)));
    assert!(app_error.to_string().starts_with("INVALID FILE TYPE PROVIDED"));
}

#[test]
fn test_appError_fromExtractionError_shouldWrap() {
    let app_error: AppError = ExtractionError::Pdf("bad xref".to_string()).into();
    assert!(app_error.to_string().contains("bad xref"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(ref message) if message == "something odd"));
}
