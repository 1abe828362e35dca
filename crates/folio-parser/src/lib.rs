//! Folio Parser Library
//!
//! Splits source files into header and body, and converts Markdown to HTML.

pub mod markdown;

use std::path::Path;

use folio_core::{SourceFile, frontmatter::parse_header};
pub use markdown::MarkdownConverter;
use thiserror::Error;
use tracing::trace;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The header block could not be parsed.
    #[error("header error: {0}")]
    Header(#[from] folio_core::CoreError),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Splits a file into its metadata header and body.
pub trait FileParser: Send + Sync {
    /// Parse already-loaded content.
    fn parse(&self, path: &Path, content: &str) -> Result<SourceFile>;

    /// Read and parse a file from disk.
    fn parse_file(&self, path: &Path) -> Result<SourceFile> {
        let content = std::fs::read_to_string(path).map_err(|source| ParserError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, &content)
    }
}

/// Parser for `---` YAML and `+++` TOML header blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderParser;

impl HeaderParser {
    /// Create a new header parser.
    pub fn new() -> Self {
        Self
    }
}

impl FileParser for HeaderParser {
    fn parse(&self, path: &Path, content: &str) -> Result<SourceFile> {
        trace!(path = %path.display(), "splitting header");
        let (header, body) = parse_header(content, path)?;
        Ok(SourceFile::new(path, header, body))
    }
}
