//! Related items resolved from header ids.

use std::collections::HashMap;

use folio_core::CollectionSpec;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use super::{CollectionDecorator, Decorator};
use crate::{error::Result, object::CollectionObject, registry::GlobalRegistry};

/// Header field listing related ids.
const RELATED_ITEMS: &str = "related_items";

/// Resolves `related_items: [ids]` headers into computed item summaries.
///
/// Ids are looked up in the collection named by the spec's
/// `related_collection`. When that is the collection being decorated, the
/// incoming sequence is used; otherwise the registry entry is read.
#[derive(Debug, Clone)]
pub struct RelatedItemsDecorator {
    priority: i32,
}

impl RelatedItemsDecorator {
    /// Default priority; after routing so URLs are known.
    pub const PRIORITY: i32 = 400;

    /// Create a related items decorator.
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

impl Default for RelatedItemsDecorator {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorator for RelatedItemsDecorator {
    fn name(&self) -> &'static str {
        "related_items"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn as_collection_decorator(&self) -> Option<&dyn CollectionDecorator> {
        Some(self)
    }
}

impl CollectionDecorator for RelatedItemsDecorator {
    fn decorate_collection(
        &self,
        mut objects: Vec<CollectionObject>,
        spec: &CollectionSpec,
        registry: &GlobalRegistry,
    ) -> Result<Vec<CollectionObject>> {
        let target = spec.related_collection();
        let summaries = if target == spec.variable_global {
            summarize(&objects)
        } else {
            match registry.collection(target) {
                Some(related) => summarize(related),
                None => {
                    warn!(
                        collection = %spec.variable_global,
                        related_collection = target,
                        "related collection is not registered"
                    );
                    HashMap::new()
                }
            }
        };

        for object in &mut objects {
            let Some((ids, invalid)) = object.file().header_value(RELATED_ITEMS).map(related_ids)
            else {
                continue;
            };
            for value in invalid {
                warn!(
                    ?value,
                    path = %object.file().path().display(),
                    "skipping related item that is not a numeric id"
                );
            }

            let mut items = Vec::with_capacity(ids.len());
            for id in ids {
                match summaries.get(&id) {
                    Some(summary) => items.push(Value::Mapping(summary.clone())),
                    None => warn!(
                        id,
                        path = %object.file().path().display(),
                        related_collection = target,
                        "skipping unknown related item"
                    ),
                }
            }

            object
                .file_mut()
                .set_computed(RELATED_ITEMS, Value::Sequence(items));
        }
        Ok(objects)
    }
}

/// Ids listed in the header, plus the entries that are not ids.
///
/// A single id is accepted as well as a list.
fn related_ids(value: &Value) -> (Vec<u64>, Vec<&Value>) {
    let items = match value {
        Value::Sequence(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut ids = Vec::with_capacity(items.len());
    let mut invalid = Vec::new();
    for item in items {
        match item.as_u64() {
            Some(id) => ids.push(id),
            None => invalid.push(item),
        }
    }
    (ids, invalid)
}

fn summarize(objects: &[CollectionObject]) -> HashMap<u64, Mapping> {
    objects
        .iter()
        .map(|object| {
            let mut summary = Mapping::new();
            summary.insert(Value::from("id"), Value::from(object.id()));
            summary.insert(
                Value::from("title"),
                object.title().map_or(Value::Null, Value::from),
            );
            summary.insert(
                Value::from("relative_url"),
                object.file().relative_url().map_or(Value::Null, Value::from),
            );
            (object.id(), summary)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use folio_core::SourceFile;

    use super::*;
    use crate::object::{ObjectKind, RenderableFile};

    fn object(id: u64, title: &str, related: Option<&str>) -> CollectionObject {
        let mut yaml = format!("title: {title}\n");
        if let Some(related) = related {
            yaml.push_str(&format!("related_items: {related}\n"));
        }
        let header: Mapping = serde_yaml::from_str(&yaml).unwrap();
        CollectionObject::new(
            id,
            ObjectKind::Post,
            title.to_lowercase(),
            None,
            RenderableFile::from_source(SourceFile::new(
                format!("_posts/{id}.md"),
                Some(header),
                "",
            )),
        )
    }

    fn related_titles(object: &CollectionObject) -> Vec<String> {
        object
            .file()
            .computed_value(RELATED_ITEMS)
            .and_then(Value::as_sequence)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("title").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_resolves_within_own_collection() {
        let objects = RelatedItemsDecorator::new()
            .decorate_collection(
                vec![
                    object(1, "One", Some("[2, 3]")),
                    object(2, "Two", None),
                    object(3, "Three", None),
                ],
                &CollectionSpec::posts(),
                &GlobalRegistry::new(),
            )
            .unwrap();

        assert_eq!(related_titles(&objects[0]), vec!["Two", "Three"]);
        assert!(objects[1].file().computed_value(RELATED_ITEMS).is_none());
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let objects = RelatedItemsDecorator::new()
            .decorate_collection(
                vec![object(1, "One", Some("[2, 99]")), object(2, "Two", None)],
                &CollectionSpec::posts(),
                &GlobalRegistry::new(),
            )
            .unwrap();

        assert_eq!(related_titles(&objects[0]), vec!["Two"]);
    }

    #[test]
    fn test_resolves_against_registry() {
        let mut registry = GlobalRegistry::new();
        registry.add_collection("lectures", vec![object(7, "Lecture", None)]);

        let spec = CollectionSpec::posts().with_related_collection("lectures");
        let objects = RelatedItemsDecorator::new()
            .decorate_collection(vec![object(1, "One", Some("7"))], &spec, &registry)
            .unwrap();

        assert_eq!(related_titles(&objects[0]), vec!["Lecture"]);
    }

    #[test]
    fn test_non_numeric_ids_are_reported() {
        let value: Value = serde_yaml::from_str("[\"7\", 2, -1]").unwrap();
        let (ids, invalid) = related_ids(&value);

        assert_eq!(ids, vec![2]);
        assert_eq!(invalid, vec![&Value::from("7"), &Value::from(-1)]);
        assert_eq!(related_ids(&Value::from(5)).0, vec![5]);
    }

    #[test]
    fn test_non_numeric_ids_are_skipped() {
        let objects = RelatedItemsDecorator::new()
            .decorate_collection(
                vec![object(1, "One", Some("[\"2\", 2]")), object(2, "Two", None)],
                &CollectionSpec::posts(),
                &GlobalRegistry::new(),
            )
            .unwrap();

        assert_eq!(related_titles(&objects[0]), vec!["Two"]);
    }
}
