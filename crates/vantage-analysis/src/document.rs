//! Document conversion collaborator
//!
//! The pipeline's PARSE stage can start from a document id instead of raw
//! material text. This module defines the conversion contract: a parse
//! always returns a well-formed [`ParsedDocument`] whose `success` flag
//! and `error` string report failure - it never panics or raises.
//!
//! Only markdown and plain text are extracted natively. Binary formats
//! (PDF, Word) are recognized but their extraction belongs to dedicated
//! conversion services, so they come back as failed parses here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recognized document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Markdown,
    Text,
    Pdf,
    Word,
    Unknown,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("md" | "markdown") => Self::Markdown,
            Some("txt") => Self::Text,
            Some("pdf") => Self::Pdf,
            Some("doc" | "docx") => Self::Word,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a document conversion
///
/// Failure is a flag plus a human-readable error, not a fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Extracted text (empty when `success` is false)
    pub content: String,

    /// Detected document format
    pub format: DocumentFormat,

    /// Format-specific metadata (file name, size, line count, ...)
    pub metadata: HashMap<String, String>,

    pub success: bool,

    /// Human-readable error when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedDocument {
    /// A successful conversion
    pub fn ok(
        content: impl Into<String>,
        format: DocumentFormat,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            content: content.into(),
            format,
            metadata,
            success: true,
            error: None,
        }
    }

    /// A failed conversion
    pub fn failed(format: DocumentFormat, error: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            format,
            metadata: HashMap::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// File-based document parser for the natively supported formats
#[derive(Debug, Clone, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a document file and extract its text
    pub fn parse(&self, path: impl AsRef<Path>) -> ParsedDocument {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path);

        if !path.exists() {
            return ParsedDocument::failed(format, format!("File not found: {}", path.display()));
        }

        match format {
            DocumentFormat::Markdown | DocumentFormat::Text => match std::fs::read_to_string(path)
            {
                Ok(content) => {
                    let mut metadata = HashMap::new();
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        metadata.insert("file_name".to_string(), name.to_string());
                    }
                    metadata.insert("size".to_string(), content.len().to_string());
                    metadata.insert("lines".to_string(), content.lines().count().to_string());
                    debug!(path = %path.display(), format = %format, "Parsed document");
                    ParsedDocument::ok(content, format, metadata)
                }
                Err(e) => ParsedDocument::failed(
                    format,
                    format!("Failed to read {}: {e}", path.display()),
                ),
            },
            DocumentFormat::Pdf | DocumentFormat::Word => ParsedDocument::failed(
                format,
                format!("No {format} extractor available; convert the document to text first"),
            ),
            DocumentFormat::Unknown => ParsedDocument::failed(
                format,
                format!("Unsupported document format: {}", path.display()),
            ),
        }
    }
}

/// Source of documents addressed by id, used by the pipeline's PARSE stage
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch and convert the document with the given id
    ///
    /// Always returns a well-formed [`ParsedDocument`]; lookup failures
    /// are reported through its `success`/`error` fields.
    async fn fetch(&self, document_id: &str) -> ParsedDocument;
}

/// Document source resolving ids to files under a base directory
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    base_dir: PathBuf,
    parser: DocumentParser,
}

impl FileDocumentSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            parser: DocumentParser::new(),
        }
    }
}

#[async_trait]
impl DocumentSource for FileDocumentSource {
    async fn fetch(&self, document_id: &str) -> ParsedDocument {
        self.parser.parse(self.base_dir.join(document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/report.md")),
            DocumentFormat::Markdown
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.TXT")),
            DocumentFormat::Text
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("10k.pdf")),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("memo.docx")),
            DocumentFormat::Word
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("mystery")),
            DocumentFormat::Unknown
        );
    }

    #[test]
    fn test_parse_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filing.md");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# Filing\nPE: 20").unwrap();

        let doc = DocumentParser::new().parse(&path);
        assert!(doc.success);
        assert_eq!(doc.format, DocumentFormat::Markdown);
        assert!(doc.content.contains("PE: 20"));
        assert_eq!(doc.metadata.get("file_name").map(String::as_str), Some("filing.md"));
    }

    #[test]
    fn test_parse_missing_file_reports_failure() {
        let doc = DocumentParser::new().parse("/nonexistent/filing.md");
        assert!(!doc.success);
        assert!(doc.error.as_deref().unwrap_or("").contains("File not found"));
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_parse_binary_format_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("10k.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = DocumentParser::new().parse(&path);
        assert!(!doc.success);
        assert_eq!(doc.format, DocumentFormat::Pdf);
        assert!(doc.error.as_deref().unwrap_or("").contains("extractor"));
    }

    #[tokio::test]
    async fn test_file_document_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.txt"), "market cap: 500").unwrap();

        let source = FileDocumentSource::new(dir.path());
        let doc = source.fetch("note.txt").await;
        assert!(doc.success);
        assert_eq!(doc.format, DocumentFormat::Text);

        let missing = source.fetch("gone.txt").await;
        assert!(!missing.success);
    }
}
