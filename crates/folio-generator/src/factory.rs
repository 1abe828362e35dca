//! Construction of collection objects and renderable files from parsed sources.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use folio_core::{CollectionSpec, SourceFile};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::{
    error::Result,
    guard::IdentityGuard,
    object::{CollectionObject, ObjectKind, RenderableFile},
};

/// Builds collection objects, checking identity as it goes.
///
/// The factory owns the run's [`IdentityGuard`], so ids stay unique per object
/// kind across every collection it builds.
#[derive(Debug, Default)]
pub struct ObjectFactory {
    guard: IdentityGuard,
}

impl ObjectFactory {
    /// Create a factory with a fresh guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one object per source file.
    ///
    /// The first violation aborts the whole collection; no partial result is
    /// returned.
    pub fn create(
        &mut self,
        files: Vec<SourceFile>,
        spec: &CollectionSpec,
    ) -> Result<Vec<CollectionObject>> {
        let kind = self.guard.ensure_is_object_kind(&spec.object)?;

        let mut objects = Vec::with_capacity(files.len());
        for source in files {
            let id = self
                .guard
                .ensure_id_is_set(&source.path, source.header.as_ref())?;
            self.guard.ensure_id_is_unique(id, kind, &source.path)?;

            objects.push(build_object(source, id, kind, spec));
        }

        debug!(
            collection = %spec.variable_global,
            count = objects.len(),
            "built collection objects"
        );
        Ok(objects)
    }

    /// Forget ids recorded by earlier runs.
    pub fn reset(&mut self) {
        self.guard.reset();
    }
}

fn build_object(
    source: SourceFile,
    id: u64,
    kind: ObjectKind,
    spec: &CollectionSpec,
) -> CollectionObject {
    let stem = source.file_stem().to_string();
    let name_date = match kind {
        ObjectKind::Post => split_date_prefix(&stem),
        ObjectKind::Entry => None,
    };

    let header_date = source.header_value("date").and_then(|value| {
        let parsed = parse_date(value);
        if parsed.is_none() {
            warn!(path = %source.path.display(), ?value, "ignoring unparsable date");
        }
        parsed
    });

    let date = header_date.or(name_date.map(|(date, _)| date));
    let slug = source
        .header_value("slug")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| match name_date {
            Some((_, rest)) => rest.to_string(),
            None => stem.clone(),
        });

    let mut file = RenderableFile::from_source(source);
    if file.layout().is_none()
        && let Some(layout) = &spec.layout
    {
        file.set_header_value("layout", Value::from(layout.as_str()));
    }

    CollectionObject::new(id, kind, slug, date, file)
}

/// Split a `YYYY-MM-DD-rest` file stem into its date and the rest.
fn split_date_prefix(stem: &str) -> Option<(NaiveDate, &str)> {
    let prefix = stem.get(..10)?;
    let rest = stem.get(10..)?.strip_prefix('-')?;
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    Some((date, rest))
}

/// Parse a header date given as `YYYY-MM-DD`, RFC 3339 or `YYYY-MM-DD HH:MM:SS`.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|d| d.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|d| d.date())
        })
}

/// Builds generic renderable files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFactory;

impl FileFactory {
    /// Create a file factory.
    pub fn new() -> Self {
        Self
    }

    /// Wrap parsed sources as renderable files.
    pub fn create(&self, files: Vec<SourceFile>) -> Vec<RenderableFile> {
        files.into_iter().map(RenderableFile::from_source).collect()
    }
}
