/*!
 * Common test utilities for the doctrans test suite
 */

use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use doctrans::app_config::{Config, ServiceSelector};
use doctrans::app_controller::Controller;
use doctrans::providers::mock::{MockChatProvider, MockTranslateProvider};
use doctrans::tokenizer::{TokenCounter, WhitespaceTokenCounter};

/// Controller wired to the in-crate mock providers
pub type MockController = Controller<MockChatProvider, MockTranslateProvider>;

/// Route library logs to the test harness output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Escape text for inclusion in WordprocessingML
fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Creates a minimal DOCX whose body holds one paragraph per item
pub fn create_test_docx(dir: &Path, filename: &str, paragraphs: &[&str]) -> Result<PathBuf> {
    let mut body = String::new();
    for paragraph in paragraphs {
        if paragraph.is_empty() {
            body.push_str("<w:p/>");
        } else {
            body.push_str(&format!(
                "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                xml_escape(paragraph)
            ));
        }
    }
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let file_path = dir.join(filename);
    let mut zip = ZipWriter::new(File::create(&file_path)?);
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(b"<?xml version=\"1.0\"?><Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>")?;
    zip.start_file("word/document.xml", options)?;
    zip.write_all(document.as_bytes())?;
    zip.finish()?;

    Ok(file_path)
}

/// Configuration for tests: output under `output_dir`, no real retry delays
pub fn test_config(output_dir: &Path, service: ServiceSelector) -> Config {
    let mut config = Config::default();
    config.output_dir = output_dir.to_path_buf();
    config.translation.service = service;
    config.translation.openai.api_key = "test-key".to_string();
    config.translation.common.retry_delay_ms = 1;
    config
}

/// Build a controller around the given mocks with whitespace token counting
pub fn mock_controller(config: Config, chat: MockChatProvider, mt: MockTranslateProvider) -> MockController {
    mock_controller_with_counter(config, Arc::new(WhitespaceTokenCounter), chat, mt)
}

/// Build a controller around the given mocks and token counter
pub fn mock_controller_with_counter(
    config: Config,
    counter: Arc<dyn TokenCounter>,
    chat: MockChatProvider,
    mt: MockTranslateProvider,
) -> MockController {
    Controller::with_parts(config, counter, Arc::new(chat), Arc::new(mt))
}

/// Read an output file back as lines
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?.lines().map(str::to_string).collect())
}
