//! Short summaries for collection listings.

use folio_core::CollectionSpec;
use serde_yaml::Value;

use super::{CollectionDecorator, Decorator};
use crate::{
    error::Result,
    object::{CollectionObject, strip_html},
    registry::GlobalRegistry,
};

/// Maximum excerpt length, in characters, when falling back to plain text.
const MAX_PLAIN_CHARS: usize = 200;

/// Sets the computed `excerpt` field of collection objects.
///
/// The excerpt is the `perex` header field when present, otherwise the first
/// paragraph of the body. Bodies without a paragraph fall back to their text,
/// cut at a word boundary.
#[derive(Debug, Clone)]
pub struct ExcerptDecorator {
    priority: i32,
}

impl ExcerptDecorator {
    /// Default priority; after Markdown conversion.
    pub const PRIORITY: i32 = 500;

    /// Create an excerpt decorator.
    pub fn new() -> Self {
        Self {
            priority: Self::PRIORITY,
        }
    }

    /// Override the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for ExcerptDecorator {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorator for ExcerptDecorator {
    fn name(&self) -> &'static str {
        "excerpt"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn as_collection_decorator(&self) -> Option<&dyn CollectionDecorator> {
        Some(self)
    }
}

impl CollectionDecorator for ExcerptDecorator {
    fn decorate_collection(
        &self,
        mut objects: Vec<CollectionObject>,
        _spec: &CollectionSpec,
        _registry: &GlobalRegistry,
    ) -> Result<Vec<CollectionObject>> {
        for object in &mut objects {
            let file = object.file();
            let excerpt = match file.header_str("perex") {
                Some(perex) => Some(perex.to_string()),
                None => excerpt_of(file.content()),
            };

            if let Some(excerpt) = excerpt {
                object
                    .file_mut()
                    .set_computed("excerpt", Value::from(excerpt));
            }
        }
        Ok(objects)
    }
}

/// First `<p>` of `html`, or its leading plain text.
fn excerpt_of(html: &str) -> Option<String> {
    if let Some(start) = html.find("<p>")
        && let Some(len) = html[start + 3..].find("</p>")
    {
        let paragraph = html[start + 3..start + 3 + len].trim();
        if !paragraph.is_empty() {
            return Some(paragraph.to_string());
        }
    }

    let text = strip_html(html);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }
    Some(truncate_words(&text, MAX_PLAIN_CHARS))
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut result = String::new();
    for word in text.split(' ') {
        let extra = usize::from(!result.is_empty()) + word.chars().count();
        if result.chars().count() + extra > max_chars {
            break;
        }
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    if result.is_empty() {
        result = text.chars().take(max_chars).collect();
    }
    result.push('…');
    result
}
