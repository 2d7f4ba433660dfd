/*!
 * Text extraction from input documents.
 *
 * Each supported document family is one variant of [`DocumentExtractor`].
 * Extraction turns a file into an ordered list of lines; the order is what
 * the chunker and the output writer rely on, so nothing here reorders or
 * merges lines.
 */

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::app_config::PdfGranularity;
use crate::errors::ExtractionError;
use crate::file_utils::FileType;

/// Extraction strategy bound to one input file
#[derive(Debug, Clone)]
pub enum DocumentExtractor {
    /// PDF read through `pdf-extract`
    Pdf {
        /// Input file
        path: PathBuf,
        /// Line or page granularity
        granularity: PdfGranularity,
    },
    /// Word document read from its `word/document.xml` part
    Word {
        /// Input file
        path: PathBuf,
    },
}

impl DocumentExtractor {
    /// Pick the extractor for a validated file type
    pub fn new(path: impl Into<PathBuf>, file_type: FileType, granularity: PdfGranularity) -> Self {
        let path = path.into();
        match file_type {
            FileType::Pdf => Self::Pdf { path, granularity },
            FileType::Doc | FileType::Docx => Self::Word { path },
        }
    }

    /// The file this extractor reads
    pub fn path(&self) -> &Path {
        match self {
            Self::Pdf { path, .. } | Self::Word { path } => path,
        }
    }

    /// Extract the document as ordered lines
    pub fn extract_lines(&self) -> Result<Vec<String>, ExtractionError> {
        let lines = match self {
            Self::Pdf { path, granularity } => {
                let bytes = read_bytes(path)?;
                let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
                pdf_pages_to_lines(&pages, *granularity)
            }
            Self::Word { path } => {
                let file = File::open(path).map_err(|e| io_error(path, e))?;
                let mut archive =
                    ZipArchive::new(file).map_err(|e| ExtractionError::Word(e.to_string()))?;
                let mut xml = String::new();
                archive
                    .by_name("word/document.xml")
                    .map_err(|e| ExtractionError::Word(format!("missing word/document.xml: {}", e)))?
                    .read_to_string(&mut xml)
                    .map_err(|e| ExtractionError::Word(e.to_string()))?;
                word_xml_to_lines(&xml)?
            }
        };

        debug!("Extracted {} lines from {:?}", lines.len(), self.path());
        Ok(lines)
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractionError> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|e| io_error(path, e))?;
    Ok(bytes)
}

fn io_error(path: &Path, error: std::io::Error) -> ExtractionError {
    ExtractionError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Flatten per-page PDF text into lines
pub fn pdf_pages_to_lines(pages: &[String], granularity: PdfGranularity) -> Vec<String> {
    match granularity {
        PdfGranularity::Line => pages
            .iter()
            .flat_map(|page| {
                page.trim()
                    .split('\n')
                    .map(|line| line.trim_end_matches('\r').to_string())
                    .collect::<Vec<_>>()
            })
            .collect(),
        PdfGranularity::Page => pages
            .iter()
            .map(|page| page.trim().replace(['\r', '\n'], " "))
            .collect(),
    }
}

/// Turn the body of `word/document.xml` into lines
///
/// Every paragraph ends a line; `<w:br/>` and `<w:cr/>` start a new one
/// inside a paragraph and `<w:tab/>` becomes a tab character.
pub fn word_xml_to_lines(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => lines.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => lines.push(std::mem::take(&mut current)),
                b"p" => lines.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| ExtractionError::Word(err.to_string()))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Word(format!("XML parse error: {}", e))),
            _ => {}
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}
