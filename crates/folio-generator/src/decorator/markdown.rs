//! Markdown body and markup field conversion.

use folio_core::{CollectionSpec, ContentType, config::MarkdownConfig};
use folio_parser::MarkdownConverter;
use serde_yaml::Value;
use tracing::trace;

use super::{CollectionDecorator, Decorator, FileDecorator};
use crate::{
    error::Result,
    object::{CollectionObject, RenderableFile},
    registry::GlobalRegistry,
};

/// Converts Markdown bodies and markup header fields to HTML.
///
/// Only `md` and `markdown` files have their body converted. Markup fields
/// such as `perex` are converted inline on every file, so a one-line perex
/// does not end up wrapped in a paragraph.
#[derive(Debug, Clone)]
pub struct MarkdownDecorator {
    converter: MarkdownConverter,
    markup_fields: Vec<String>,
    priority: i32,
}

impl MarkdownDecorator {
    /// Default priority; runs before anything that reads HTML.
    pub const PRIORITY: i32 = 800;

    /// Create a decorator from the Markdown settings.
    pub fn new(config: &MarkdownConfig) -> Self {
        Self {
            converter: MarkdownConverter::new().with_headline_anchors(config.headline_anchors),
            markup_fields: config.markup_fields.clone(),
            priority: Self::PRIORITY,
        }
    }

    /// Override the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn decorate(&self, file: &mut RenderableFile) {
        if file.content_type() == Some(ContentType::Markdown) {
            trace!(path = %file.path().display(), "converting markdown body");
            let html = self.converter.convert(file.content());
            file.set_content(html);
        }

        for field in &self.markup_fields {
            let Some(markdown) = file.header_str(field) else {
                continue;
            };
            let html = self.converter.convert_inline(markdown);
            file.set_header_value(field, Value::from(html));
        }
    }
}

impl Default for MarkdownDecorator {
    fn default() -> Self {
        Self::new(&MarkdownConfig::default())
    }
}

impl Decorator for MarkdownDecorator {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn as_file_decorator(&self) -> Option<&dyn FileDecorator> {
        Some(self)
    }

    fn as_collection_decorator(&self) -> Option<&dyn CollectionDecorator> {
        Some(self)
    }
}

impl FileDecorator for MarkdownDecorator {
    fn decorate_files(
        &self,
        mut files: Vec<RenderableFile>,
        _registry: &GlobalRegistry,
    ) -> Result<Vec<RenderableFile>> {
        for file in &mut files {
            self.decorate(file);
        }
        Ok(files)
    }
}

impl CollectionDecorator for MarkdownDecorator {
    fn decorate_collection(
        &self,
        mut objects: Vec<CollectionObject>,
        _spec: &CollectionSpec,
        _registry: &GlobalRegistry,
    ) -> Result<Vec<CollectionObject>> {
        for object in &mut objects {
            self.decorate(object.file_mut());
        }
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use folio_core::SourceFile;
    use serde_yaml::Mapping;

    use super::*;

    fn file(path: &str, perex: Option<&str>, body: &str) -> RenderableFile {
        let header = perex.map(|perex| {
            let mut header = Mapping::new();
            header.insert(Value::from("perex"), Value::from(perex));
            header
        });
        RenderableFile::from_source(SourceFile::new(path, header, body))
    }

    fn decorate(files: Vec<RenderableFile>) -> Vec<RenderableFile> {
        MarkdownDecorator::default()
            .decorate_files(files, &GlobalRegistry::new())
            .unwrap()
    }

    #[test]
    fn test_markdown_body_is_converted() {
        let files = decorate(vec![file("someFile.md", None, "# Content...")]);
        assert!(files[0].content().contains("<h1>Content...</h1>"));
    }

    #[test]
    fn test_other_extensions_pass_through() {
        let files = decorate(vec![
            file("someFile.latte", None, "# Content..."),
            file("page.html", None, "# Content..."),
        ]);
        assert_eq!(files[0].content(), "# Content...");
        assert_eq!(files[1].content(), "# Content...");
    }

    #[test]
    fn test_markdown_extension_is_case_insensitive() {
        let files = decorate(vec![file("notes.MARKDOWN", None, "*hi*")]);
        assert!(files[0].content().contains("<em>hi</em>"));
    }

    #[test]
    fn test_perex_is_converted_inline() {
        let files = decorate(vec![file("someFile.md", Some("**Hey**"), "")]);
        assert_eq!(files[0].header_str("perex"), Some("<strong>Hey</strong>"));
    }

    #[test]
    fn test_perex_converted_regardless_of_body_type() {
        let files = decorate(vec![file("someFile.latte", Some("**Hey**"), "# Keep")]);
        assert_eq!(files[0].header_str("perex"), Some("<strong>Hey</strong>"));
        assert_eq!(files[0].content(), "# Keep");
    }

    #[test]
    fn test_headline_anchors() {
        let config = MarkdownConfig {
            headline_anchors: true,
            ..MarkdownConfig::default()
        };
        let files = MarkdownDecorator::new(&config)
            .decorate_files(
                vec![file("a.md", None, "## Getting Started")],
                &GlobalRegistry::new(),
            )
            .unwrap();
        assert!(files[0].content().contains("id=\"getting-started\""));
    }
}
