//! Source files as delivered by the parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Type of a renderable source, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Lightweight markup converted to HTML (.md files).
    Markdown,
    /// Plain HTML pages.
    Html,
    /// Template sources handed to the template stage untouched (.twig, .latte).
    Template,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            "twig" | "latte" => Some(Self::Template),
            _ => None,
        }
    }
}

/// A located file split into its header block and body.
///
/// `header` is `None` when the file carries no header block at all, which is
/// distinct from an empty header.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Absolute (or caller-rooted) path of the file.
    pub path: PathBuf,

    /// Path relative to the site source directory.
    pub relative_path: PathBuf,

    /// Parsed header block.
    pub header: Option<Mapping>,

    /// Raw body without the header block.
    pub body: String,
}

impl SourceFile {
    /// Create a source file; the relative path defaults to the full path.
    pub fn new(path: impl Into<PathBuf>, header: Option<Mapping>, body: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            relative_path: path.clone(),
            path,
            header,
            body: body.into(),
        }
    }

    /// Set the path relative to the source directory.
    #[must_use]
    pub fn with_relative_path(mut self, relative_path: impl Into<PathBuf>) -> Self {
        self.relative_path = relative_path.into();
        self
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path)
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Content type inferred from the extension.
    pub fn content_type(&self) -> Option<ContentType> {
        self.extension()
            .and_then(|ext| ContentType::from_extension(&ext))
    }

    /// Look up a header value by key.
    pub fn header_value(&self, key: &str) -> Option<&Value> {
        self.header.as_ref().and_then(|h| h.get(key))
    }
}

/// Lowercased extension of a path.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}
