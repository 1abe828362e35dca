//! Output paths and relative URLs.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use folio_core::CollectionSpec;

use super::{CollectionDecorator, Decorator, FileDecorator};
use crate::{
    error::{GeneratorError, Result},
    object::{CollectionObject, RenderableFile},
    registry::GlobalRegistry,
};

/// Header field that replaces the computed route.
const PERMALINK: &str = "permalink";

/// Computes where each file is written and the URL it is served under.
#[derive(Debug, Clone)]
pub struct RouteDecorator {
    priority: i32,
}

impl RouteDecorator {
    /// Default priority.
    pub const PRIORITY: i32 = 700;

    /// Create a route decorator.
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

impl Default for RouteDecorator {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorator for RouteDecorator {
    fn name(&self) -> &'static str {
        "route"
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

impl FileDecorator for RouteDecorator {
    fn decorate_files(
        &self,
        mut files: Vec<RenderableFile>,
        _registry: &GlobalRegistry,
    ) -> Result<Vec<RenderableFile>> {
        for file in &mut files {
            let (output, url) = match file.header_str(PERMALINK) {
                Some(permalink) => permalink_route(permalink),
                None => file_route(file),
            };
            file.set_route(output, url);
        }
        Ok(files)
    }
}

impl CollectionDecorator for RouteDecorator {
    fn decorate_collection(
        &self,
        mut objects: Vec<CollectionObject>,
        spec: &CollectionSpec,
        _registry: &GlobalRegistry,
    ) -> Result<Vec<CollectionObject>> {
        for object in &mut objects {
            let (output, url) = match object.file().header_str(PERMALINK) {
                Some(permalink) => permalink_route(permalink),
                None => {
                    let prefix =
                        expand_prefix(&spec.route_prefix, object.date(), object.file().path())?;
                    directory_route(&format!("{prefix}/{}", object.slug()))
                }
            };
            object.file_mut().set_route(output, url);
        }
        Ok(objects)
    }
}

/// Fill `:year`, `:month` and `:day` segments from the object date.
fn expand_prefix(prefix: &str, date: Option<NaiveDate>, path: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for segment in prefix.split('/').filter(|s| !s.is_empty()) {
        let format = match segment {
            ":year" => "%Y",
            ":month" => "%m",
            ":day" => "%d",
            literal => {
                segments.push(literal.to_string());
                continue;
            }
        };

        let date = date.ok_or_else(|| GeneratorError::UnresolvedRoute {
            path: path.to_path_buf(),
            placeholder: segment.to_string(),
        })?;
        segments.push(date.format(format).to_string());
    }
    Ok(segments.join("/"))
}

/// `dir/index.html` served as `/dir/`; the empty directory is the site root.
fn directory_route(dir: &str) -> (PathBuf, String) {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        (PathBuf::from("index.html"), "/".to_string())
    } else {
        (PathBuf::from(dir).join("index.html"), format!("/{dir}/"))
    }
}

/// A permalink with an extension is a file; anything else is a directory.
fn permalink_route(permalink: &str) -> (PathBuf, String) {
    let trimmed = permalink.trim_matches('/');
    if Path::new(trimmed).extension().is_some() {
        (PathBuf::from(trimmed), format!("/{trimmed}"))
    } else {
        directory_route(trimmed)
    }
}

fn file_route(file: &RenderableFile) -> (PathBuf, String) {
    let relative = url_path(file.relative_path());
    let parent = match relative.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    };
    let stem = file.file_stem();

    if file.content_type().is_none() {
        return (PathBuf::from(&relative), format!("/{relative}"));
    }

    if stem == "index" {
        directory_route(parent)
    } else if parent.is_empty() {
        directory_route(stem)
    } else {
        directory_route(&format!("{parent}/{stem}"))
    }
}

/// Relative path joined with `/`, whatever the platform separator.
fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use folio_core::SourceFile;
    use serde_yaml::{Mapping, Value};

    use super::*;
    use crate::object::ObjectKind;

    fn object(slug: &str, date: Option<NaiveDate>, permalink: Option<&str>) -> CollectionObject {
        let header = permalink.map(|permalink| {
            let mut header = Mapping::new();
            header.insert(Value::from("permalink"), Value::from(permalink));
            header
        });
        CollectionObject::new(
            1,
            ObjectKind::Post,
            slug.to_string(),
            date,
            RenderableFile::from_source(SourceFile::new("_posts/x.md", header, "")),
        )
    }

    fn route_collection(
        objects: Vec<CollectionObject>,
        spec: &CollectionSpec,
    ) -> Result<Vec<CollectionObject>> {
        RouteDecorator::new().decorate_collection(objects, spec, &GlobalRegistry::new())
    }

    fn route_file(relative: &str) -> RenderableFile {
        let source = SourceFile::new(format!("/site/source/{relative}"), None, "")
            .with_relative_path(relative);
        let files = RouteDecorator::new()
            .decorate_files(vec![RenderableFile::from_source(source)], &GlobalRegistry::new())
            .unwrap();
        files.into_iter().next().unwrap()
    }

    #[test]
    fn test_dated_collection_route() {
        let objects = route_collection(
            vec![object("hello", NaiveDate::from_ymd_opt(2024, 3, 7), None)],
            &CollectionSpec::posts(),
        )
        .unwrap();

        let file = objects[0].file();
        assert_eq!(file.relative_url(), Some("/blog/2024/03/07/hello/"));
        assert_eq!(
            file.output_path(),
            Some(Path::new("blog/2024/03/07/hello/index.html"))
        );
    }

    #[test]
    fn test_undated_placeholder_fails() {
        let result = route_collection(vec![object("hello", None, None)], &CollectionSpec::posts());
        assert!(matches!(
            result,
            Err(GeneratorError::UnresolvedRoute { ref placeholder, .. }) if placeholder == ":year"
        ));
    }

    #[test]
    fn test_static_prefix_needs_no_date() {
        let spec =
            CollectionSpec::new("lecture", "lectures", "_lectures").with_route_prefix("lectures");
        let objects = route_collection(vec![object("intro", None, None)], &spec).unwrap();
        assert_eq!(objects[0].file().relative_url(), Some("/lectures/intro/"));
    }

    #[test]
    fn test_permalink_overrides_route() {
        let objects = route_collection(
            vec![
                object("a", None, Some("/custom/place/")),
                object("b", None, Some("feed.xml")),
            ],
            &CollectionSpec::posts(),
        )
        .unwrap();

        assert_eq!(objects[0].file().relative_url(), Some("/custom/place/"));
        assert_eq!(
            objects[0].file().output_path(),
            Some(Path::new("custom/place/index.html"))
        );
        assert_eq!(objects[1].file().relative_url(), Some("/feed.xml"));
        assert_eq!(objects[1].file().output_path(), Some(Path::new("feed.xml")));
    }

    #[test]
    fn test_generic_file_routes() {
        let index = route_file("index.twig");
        assert_eq!(index.relative_url(), Some("/"));
        assert_eq!(index.output_path(), Some(Path::new("index.html")));

        let about = route_file("about.md");
        assert_eq!(about.relative_url(), Some("/about/"));
        assert_eq!(about.output_path(), Some(Path::new("about/index.html")));

        let nested = route_file("docs/install.latte");
        assert_eq!(nested.relative_url(), Some("/docs/install/"));

        let nested_index = route_file("docs/index.html");
        assert_eq!(nested_index.relative_url(), Some("/docs/"));
        assert_eq!(nested_index.output_path(), Some(Path::new("docs/index.html")));

        let asset = route_file("assets/style.css");
        assert_eq!(asset.relative_url(), Some("/assets/style.css"));
        assert_eq!(asset.output_path(), Some(Path::new("assets/style.css")));
    }
}
