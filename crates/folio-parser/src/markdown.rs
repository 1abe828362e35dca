//! Markdown to HTML conversion using pulldown-cmark.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

/// Markdown converter with optional heading anchors.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: Options,
    headline_anchors: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter {
    /// Create a new converter with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            headline_anchors: false,
        }
    }

    /// Enable or disable `id` attributes and self-links on headings.
    #[must_use]
    pub fn with_headline_anchors(mut self, enabled: bool) -> Self {
        self.headline_anchors = enabled;
        self
    }

    /// Convert a Markdown document to HTML.
    pub fn convert(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);

        if self.headline_anchors {
            html::push_html(&mut output, anchor_headings(parser).into_iter());
        } else {
            html::push_html(&mut output, parser);
        }

        output
    }

    /// Convert a single line of Markdown, without the paragraph wrapper.
    pub fn convert_inline(&self, markdown: &str) -> String {
        let converted = self.convert(markdown);
        let trimmed = converted.trim();

        match trimmed
            .strip_prefix("<p>")
            .and_then(|rest| rest.strip_suffix("</p>"))
        {
            Some(inner) if !inner.contains("<p>") => inner.to_string(),
            _ => trimmed.to_string(),
        }
    }
}

/// Rewrite headings into `<hN id="slug"><a href="#slug">...</a></hN>`.
fn anchor_headings<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut heading: Option<(pulldown_cmark::HeadingLevel, Option<String>, Vec<Event<'a>>)> =
        None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                heading = Some((level, id.map(|i| i.to_string()), Vec::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, id, inner)) = heading.take() {
                    let text: String = inner
                        .iter()
                        .filter_map(|e| match e {
                            Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
                            _ => None,
                        })
                        .collect();
                    let slug = id.unwrap_or_else(|| slugify(&text));

                    events.push(Event::Html(
                        format!("<{level} id=\"{slug}\"><a href=\"#{slug}\" class=\"heading-anchor\">")
                            .into(),
                    ));
                    events.extend(inner);
                    events.push(Event::Html(format!("</a></{level}>\n").into()));
                }
            }
            other => match heading {
                Some((_, _, ref mut inner)) => inner.push(other),
                None => events.push(other),
            },
        }
    }

    events
}

/// Convert text to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_heading() {
        let converter = MarkdownConverter::new();
        let html = converter.convert("# Content...");
        assert_eq!(html, "<h1>Content...</h1>\n");
    }

    #[test]
    fn test_convert_paragraph_with_strong() {
        let converter = MarkdownConverter::new();
        let html = converter.convert("Some **bold** text");
        assert_eq!(html, "<p>Some <strong>bold</strong> text</p>\n");
    }

    #[test]
    fn test_convert_inline_strips_paragraph() {
        let converter = MarkdownConverter::new();
        assert_eq!(converter.convert_inline("**Hey**"), "<strong>Hey</strong>");
    }

    #[test]
    fn test_convert_inline_keeps_multiple_paragraphs() {
        let converter = MarkdownConverter::new();
        let html = converter.convert_inline("One\n\nTwo");
        assert_eq!(html, "<p>One</p>\n<p>Two</p>");
    }

    #[test]
    fn test_headline_anchors() {
        let converter = MarkdownConverter::new().with_headline_anchors(true);
        let html = converter.convert("## Getting `started` now\n\nText");

        assert!(html.starts_with(
            "<h2 id=\"getting-started-now\"><a href=\"#getting-started-now\" class=\"heading-anchor\">"
        ));
        assert!(html.contains("<code>started</code>"));
        assert!(html.contains("</a></h2>"));
        assert!(html.contains("<p>Text</p>"));
    }

    #[test]
    fn test_headline_anchor_uses_explicit_id() {
        let converter = MarkdownConverter::new().with_headline_anchors(true);
        let html = converter.convert("# Intro {#custom}");
        assert!(html.contains("<h1 id=\"custom\">"));
        assert!(html.contains("href=\"#custom\""));
    }

    #[test]
    fn test_table_rendering() {
        let converter = MarkdownConverter::new();
        let html = converter.convert(
            r#"| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |"#,
        );

        assert!(html.contains("<table>"));
        assert!(html.contains("<thead>"));
        assert!(html.contains("<td>"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test 123 Post"), "test-123-post");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("Special!@#Chars"), "specialchars");
    }
}
