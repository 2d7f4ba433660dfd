use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ValidationError;

// @module: File and directory utilities

/// Document types accepted as input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Portable Document Format
    Pdf,
    /// Legacy Word document tag (read through the Word path)
    Doc,
    /// Office Open XML Word document
    Docx,
}

impl FileType {
    /// Every accepted file type, in display order
    pub const ALL: [FileType; 3] = [Self::Pdf, Self::Doc, Self::Docx];

    // @returns: Lowercase tag as accepted on input
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }

    /// Render the accepted tags for messages, e.g. `[pdf, doc, docx]`
    pub fn tag_list() -> String {
        let tags: Vec<&str> = Self::ALL.iter().map(|t| t.tag()).collect();
        format!("[{}]", tags.join(", "))
    }

    /// Infer the type from a path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ValidationError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        ext.parse()
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for FileType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|file_type| file_type.tag() == s)
            .ok_or_else(|| ValidationError::InvalidFileType(s.to_string()))
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a translation run
    // @params: output_dir, service tag, chunk token limit
    pub fn generate_output_path<P: AsRef<Path>>(
        output_dir: P,
        service: &str,
        chunk_token_limit: usize,
    ) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("output_{}_chunk_{}.txt", service, chunk_token_limit))
    }

    /// Write one line per item, creating the parent directory when needed
    pub fn write_lines<P: AsRef<Path>, S: AsRef<str>>(path: P, lines: &[S]) -> Result<()> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }
        Self::write_to_file(path, &content)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
