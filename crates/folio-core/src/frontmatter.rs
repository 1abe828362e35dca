//! Header block splitting and parsing.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, Result};

/// Delimiter types for header blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML header delimited by `---`.
    Yaml,
    /// TOML header delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into header block and body.
///
/// Returns `None` when the content does not open with a delimiter or the
/// closing delimiter is missing.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();

    // The closing delimiter must start a line.
    let after_first = &content[delimiter.len()..];
    let closing_pos = after_first
        .match_indices(delimiter)
        .map(|(pos, _)| pos)
        .find(|&pos| pos == 0 || after_first[..pos].ends_with('\n'))?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse the header block of `content` into a mapping.
///
/// The header is `None` when no header block is present; an empty block
/// yields an empty mapping.
pub fn parse_header(content: &str, path: &Path) -> Result<(Option<Mapping>, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((None, content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Some(Mapping::new()), body.to_string()));
    }

    let value: Value = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            let table: toml::Table =
                toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;
            toml_to_yaml(toml::Value::Table(table))
        }
    };

    match value {
        Value::Mapping(mapping) => Ok((Some(mapping), body.to_string())),
        Value::Null => Ok((Some(Mapping::new()), body.to_string())),
        other => Err(CoreError::frontmatter(
            path,
            format!("header must be a key/value mapping, found {other:?}"),
        )),
    }
}

/// Convert a TOML value into the YAML value model used for headers.
///
/// Dates and times become their RFC 3339 text.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(toml_to_yaml).collect())
        }
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
                .collect(),
        ),
    }
}
