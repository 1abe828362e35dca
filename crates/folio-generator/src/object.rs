//! Renderable files and generated collection objects.
//!
//! Objects are read-only from the outside. Only the decorators of this crate
//! change them, through the `pub(crate)` setters.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDate;
use folio_core::{ContentType, SourceFile, content::extension_of};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::GeneratorError;

/// Words per minute used for reading time estimates.
const WORDS_PER_MINUTE: usize = 260;

/// Kind of generated object a collection is built into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Dated article; the date may come from a `YYYY-MM-DD-` file name prefix.
    Post,
    /// Undated entry such as a lecture or a project page.
    Entry,
}

impl ObjectKind {
    /// Every recognised kind.
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Post, ObjectKind::Entry];

    /// Tag used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Entry => "entry",
        }
    }

    /// Look up a kind by its configuration tag.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Comma separated list of recognised tags.
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(ObjectKind::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| GeneratorError::InvalidObjectKind {
            kind: s.to_string(),
            expected: Self::expected(),
        })
    }
}

/// Result of looking up a field by name.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldLookup {
    /// The field exists.
    Found(Value),
    /// The field does not exist.
    NotFound(FieldNotFound),
}

impl FieldLookup {
    /// The value, if found.
    pub fn found(self) -> Option<Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound(_) => None,
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<Value, FieldNotFound> {
        match self {
            Self::Found(value) => Ok(value),
            Self::NotFound(missing) => Err(missing),
        }
    }
}

/// A field lookup miss, with the keys that would have matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNotFound {
    /// Name of the object kind or file the lookup ran on.
    pub owner: String,
    /// Key that was asked for.
    pub requested: String,
    /// Keys the object does have.
    pub available: Vec<String>,
    /// Closest available key, if any is close enough.
    pub suggestion: Option<String>,
}

impl fmt::Display for FieldNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value \"{}\" was not found for \"{}\" object. ",
            self.requested, self.owner
        )?;
        match &self.suggestion {
            Some(suggestion) => write!(f, "Did you mean \"{suggestion}\"?"),
            None => {
                let keys = self
                    .available
                    .iter()
                    .map(|k| format!("\"{k}\""))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Available keys are: {keys}.")
            }
        }
    }
}

impl std::error::Error for FieldNotFound {}

/// Closest key to `requested` among `available`.
///
/// A key qualifies when it is at most two edits away and closer than the
/// length of the request.
pub fn suggest_key<'a>(
    requested: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    available
        .into_iter()
        .map(|key| (strsim::levenshtein(requested, key), key))
        .filter(|(distance, _)| *distance <= 2 && *distance < requested.chars().count())
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, key)| key.to_string())
}

fn lookup(owner: &str, fields: Vec<(String, Value)>, key: &str) -> FieldLookup {
    let mut available: Vec<String> = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        if name == key {
            return FieldLookup::Found(value);
        }
        if !available.contains(&name) {
            available.push(name);
        }
    }

    let suggestion = suggest_key(key, available.iter().map(String::as_str));
    FieldLookup::NotFound(FieldNotFound {
        owner: owner.to_string(),
        requested: key.to_string(),
        available,
        suggestion,
    })
}

/// A renderable file with its header, body and computed routing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableFile {
    path: PathBuf,
    relative_path: PathBuf,
    header: Mapping,
    content: String,
    output_path: Option<PathBuf>,
    relative_url: Option<String>,
    computed: Mapping,
}

impl RenderableFile {
    pub(crate) fn from_source(source: SourceFile) -> Self {
        Self {
            path: source.path,
            relative_path: source.relative_path,
            header: source.header.unwrap_or_default(),
            content: source.body,
            output_path: None,
            relative_url: None,
            computed: Mapping::new(),
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source path relative to the source directory.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Lowercased source extension.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.path)
    }

    /// Content type inferred from the extension.
    pub fn content_type(&self) -> Option<ContentType> {
        self.extension()
            .and_then(|ext| ContentType::from_extension(&ext))
    }

    /// Source file name without extension.
    pub fn file_stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Header mapping.
    pub fn header(&self) -> &Mapping {
        &self.header
    }

    /// Header value by key.
    pub fn header_value(&self, key: &str) -> Option<&Value> {
        self.header.get(key)
    }

    /// Header value as a string.
    pub fn header_str(&self, key: &str) -> Option<&str> {
        self.header_value(key).and_then(Value::as_str)
    }

    /// `title` header field.
    pub fn title(&self) -> Option<&str> {
        self.header_str("title")
    }

    /// `layout` header field.
    pub fn layout(&self) -> Option<&str> {
        self.header_str("layout")
    }

    /// Current body.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Output path relative to the output directory, once routed.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Site-relative URL, once routed.
    pub fn relative_url(&self) -> Option<&str> {
        self.relative_url.as_deref()
    }

    /// Fields computed by decorators.
    pub fn computed(&self) -> &Mapping {
        &self.computed
    }

    /// Computed field by key.
    pub fn computed_value(&self, key: &str) -> Option<&Value> {
        self.computed.get(key)
    }

    /// Look up any field by name.
    ///
    /// Built-in fields win over computed fields, which win over header fields.
    pub fn field(&self, key: &str) -> FieldLookup {
        let owner = self.relative_path.display().to_string();
        lookup(&owner, self.fields(Vec::new()), key)
    }

    /// Built-in fields followed by `leading`, then computed and header fields.
    fn fields(&self, leading: Vec<(String, Value)>) -> Vec<(String, Value)> {
        let mut fields = leading;
        fields.push(("content".to_string(), Value::from(self.content.as_str())));
        if let Some(url) = &self.relative_url {
            fields.push(("relative_url".to_string(), Value::from(url.as_str())));
        }
        if let Some(output) = &self.output_path {
            fields.push((
                "output_path".to_string(),
                Value::from(output.to_string_lossy().into_owned()),
            ));
        }
        for source in [&self.computed, &self.header] {
            fields.extend(
                source
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone()))),
            );
        }
        fields
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn set_header_value(&mut self, key: &str, value: Value) {
        self.header.insert(Value::from(key), value);
    }

    pub(crate) fn set_route(&mut self, output_path: PathBuf, relative_url: String) {
        self.output_path = Some(output_path);
        self.relative_url = Some(relative_url);
    }

    pub(crate) fn set_computed(&mut self, key: &str, value: Value) {
        self.computed.insert(Value::from(key), value);
    }
}

/// One file of a collection, built by the object factory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionObject {
    id: u64,
    kind: ObjectKind,
    slug: String,
    date: Option<NaiveDate>,
    #[serde(flatten)]
    file: RenderableFile,
}

impl CollectionObject {
    pub(crate) fn new(
        id: u64,
        kind: ObjectKind,
        slug: String,
        date: Option<NaiveDate>,
        file: RenderableFile,
    ) -> Self {
        Self {
            id,
            kind,
            slug,
            date,
            file,
        }
    }

    /// Numeric identity, unique per object kind.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Object kind.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// URL slug.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Object date, if known.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Title header field.
    pub fn title(&self) -> Option<&str> {
        self.file.title()
    }

    /// Current body.
    pub fn content(&self) -> &str {
        self.file.content()
    }

    /// Underlying renderable file.
    pub fn file(&self) -> &RenderableFile {
        &self.file
    }

    pub(crate) fn file_mut(&mut self) -> &mut RenderableFile {
        &mut self.file
    }

    /// Estimated reading time of a post, rounded up to whole minutes.
    pub fn reading_time_minutes(&self) -> Option<usize> {
        if self.kind != ObjectKind::Post {
            return None;
        }
        let words = strip_html(self.file.content()).split_whitespace().count();
        Some(words.div_ceil(WORDS_PER_MINUTE).max(1))
    }

    /// Look up any field by name.
    ///
    /// Built-in fields win over computed fields, which win over header fields.
    pub fn field(&self, key: &str) -> FieldLookup {
        let mut fields = vec![
            ("id".to_string(), Value::from(self.id)),
            ("kind".to_string(), Value::from(self.kind.name())),
            ("slug".to_string(), Value::from(self.slug.as_str())),
        ];
        if let Some(date) = self.date {
            fields.push(("date".to_string(), Value::from(date.to_string())));
        }
        if let Some(minutes) = self.reading_time_minutes() {
            fields.push(("reading_time".to_string(), Value::from(minutes as u64)));
        }

        lookup(self.kind.name(), self.file.fields(fields), key)
    }
}

/// Strip HTML tags from content.
pub(crate) fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> CollectionObject {
        let mut header = Mapping::new();
        header.insert(Value::from("id"), Value::from(5));
        header.insert(Value::from("title"), Value::from("Hello"));
        let source = SourceFile::new("_posts/2024-01-02-hello.md", Some(header), "Body text");
        CollectionObject::new(
            5,
            ObjectKind::Post,
            "hello".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 2),
            RenderableFile::from_source(source),
        )
    }

    #[test]
    fn test_object_kind_names() {
        assert_eq!(ObjectKind::from_name("post"), Some(ObjectKind::Post));
        assert_eq!(ObjectKind::from_name("entry"), Some(ObjectKind::Entry));
        assert_eq!(ObjectKind::from_name("Post"), None);
        assert_eq!(ObjectKind::expected(), "post, entry");
    }

    #[test]
    fn test_object_kind_from_str_error() {
        let err = "lecture".parse::<ObjectKind>().unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::InvalidObjectKind { ref kind, .. } if kind == "lecture"
        ));
    }

    #[test]
    fn test_field_found() {
        let post = post();
        assert_eq!(post.field("id").found(), Some(Value::from(5u64)));
        assert_eq!(post.field("title").found(), Some(Value::from("Hello")));
        assert_eq!(post.field("date").found(), Some(Value::from("2024-01-02")));
        assert_eq!(post.field("reading_time").found(), Some(Value::from(1u64)));
    }

    #[test]
    fn test_computed_field_shadows_header() {
        let mut post = post();
        post.file_mut()
            .set_header_value("excerpt", Value::from("from header"));
        post.file_mut()
            .set_computed("excerpt", Value::from("computed"));
        assert_eq!(post.field("excerpt").found(), Some(Value::from("computed")));
    }

    #[test]
    fn test_field_not_found_with_suggestion() {
        let missing = post().field("tite").into_result().unwrap_err();
        assert_eq!(missing.suggestion.as_deref(), Some("title"));
        assert_eq!(
            missing.to_string(),
            "value \"tite\" was not found for \"post\" object. Did you mean \"title\"?"
        );
    }

    #[test]
    fn test_field_not_found_lists_keys() {
        let missing = post().field("key").into_result().unwrap_err();
        assert!(missing.suggestion.is_none());
        assert!(missing.available.contains(&"id".to_string()));
        assert!(missing.available.contains(&"title".to_string()));
        assert!(missing.to_string().contains("Available keys are: \"id\""));
    }

    #[test]
    fn test_suggest_key() {
        assert_eq!(
            suggest_key("relative_ulr", ["relative_url", "title"]),
            Some("relative_url".to_string())
        );
        assert_eq!(suggest_key("xyz", ["id", "title"]), None);
        assert_eq!(suggest_key("a", ["b"]), None);
    }

    #[test]
    fn test_renderable_file_routing() {
        let mut file = RenderableFile::from_source(SourceFile::new("about.md", None, "About"));
        assert!(file.header().is_empty());
        assert!(file.output_path().is_none());

        file.set_route(PathBuf::from("about/index.html"), "/about/".to_string());
        assert_eq!(file.relative_url(), Some("/about/"));
        assert_eq!(
            file.field("relative_url").found(),
            Some(Value::from("/about/"))
        );
    }

    #[test]
    fn test_reading_time_only_for_posts() {
        let entry = CollectionObject::new(
            1,
            ObjectKind::Entry,
            "x".to_string(),
            None,
            RenderableFile::from_source(SourceFile::new("x.md", None, "text")),
        );
        assert!(entry.reading_time_minutes().is_none());

        let long = "word ".repeat(600);
        let post = CollectionObject::new(
            2,
            ObjectKind::Post,
            "y".to_string(),
            None,
            RenderableFile::from_source(SourceFile::new("y.md", None, long)),
        );
        assert_eq!(post.reading_time_minutes(), Some(3));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>World</strong></p>"),
            "Hello World"
        );
        assert_eq!(strip_html("No tags here"), "No tags here");
    }
}
