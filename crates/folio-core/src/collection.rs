//! Collection declarations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Variable name of the collection that may be absent from the source tree
/// when no explicit `optional` flag is given.
pub const LEGACY_OPTIONAL_COLLECTION: &str = "posts";

/// Declares one named collection of generated objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Singular variable name used for one object (e.g. `post`).
    pub name: String,

    /// Registry key the finished collection is published under (e.g. `posts`).
    pub variable_global: String,

    /// Source directory, relative to the site source directory.
    pub path: PathBuf,

    /// Object kind tag (e.g. `post`, `entry`).
    #[serde(default = "default_object")]
    pub object: String,

    /// Routing pattern; may contain `:year`, `:month` and `:day`.
    #[serde(default)]
    pub route_prefix: String,

    /// Layout handed to the template stage.
    #[serde(default)]
    pub layout: Option<String>,

    /// Sort policy; date descending when absent.
    #[serde(default)]
    pub sort: SortPolicy,

    /// Whether a missing source directory is tolerated.
    #[serde(default)]
    pub optional: Option<bool>,

    /// Collection that `related_items` ids refer to; defaults to this one.
    #[serde(default)]
    pub related_collection: Option<String>,
}

impl CollectionSpec {
    /// Create a spec with default object kind, routing and sorting.
    pub fn new(
        name: impl Into<String>,
        variable_global: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            variable_global: variable_global.into(),
            path: path.into(),
            object: default_object(),
            route_prefix: String::new(),
            layout: None,
            sort: SortPolicy::default(),
            optional: None,
            related_collection: None,
        }
    }

    /// The stock `posts` collection.
    pub fn posts() -> Self {
        Self::new("post", "posts", "_posts")
            .with_route_prefix("blog/:year/:month/:day")
            .with_layout("_layouts/post.twig")
    }

    /// Set the object kind tag.
    #[must_use]
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = object.into();
        self
    }

    /// Set the routing pattern.
    #[must_use]
    pub fn with_route_prefix(mut self, route_prefix: impl Into<String>) -> Self {
        self.route_prefix = route_prefix.into();
        self
    }

    /// Set the layout.
    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Set the sort policy.
    #[must_use]
    pub fn with_sort(mut self, sort: SortPolicy) -> Self {
        self.sort = sort;
        self
    }

    /// Set the optional flag explicitly.
    #[must_use]
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    /// Set the collection that related item ids are resolved against.
    #[must_use]
    pub fn with_related_collection(mut self, collection: impl Into<String>) -> Self {
        self.related_collection = Some(collection.into());
        self
    }

    /// Whether a missing source directory is skipped instead of failing.
    ///
    /// Without an explicit flag only the `posts` collection is optional.
    pub fn is_optional(&self) -> bool {
        self.optional
            .unwrap_or(self.variable_global == LEGACY_OPTIONAL_COLLECTION)
    }

    /// Registry key related item ids are looked up under.
    pub fn related_collection(&self) -> &str {
        self.related_collection
            .as_deref()
            .unwrap_or(&self.variable_global)
    }
}

/// Field a collection is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Object date.
    Date,
    /// Numeric id.
    Id,
    /// `title` header field.
    Title,
    /// Any other header field.
    #[serde(untagged)]
    Field(String),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Ordering policy for a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPolicy {
    /// Field compared first.
    #[serde(default = "default_sort_key")]
    pub by: SortKey,

    /// Direction for both the key and the id tie-breaker.
    #[serde(default = "default_sort_order")]
    pub order: SortOrder,
}

impl SortPolicy {
    /// Create a sort policy.
    pub fn new(by: SortKey, order: SortOrder) -> Self {
        Self { by, order }
    }
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self {
            by: default_sort_key(),
            order: default_sort_order(),
        }
    }
}

fn default_object() -> String {
    "post".to_string()
}

fn default_sort_key() -> SortKey {
    SortKey::Date
}

fn default_sort_order() -> SortOrder {
    SortOrder::Desc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_defaults() {
        let spec = CollectionSpec::posts();
        assert_eq!(spec.variable_global, "posts");
        assert_eq!(spec.path, PathBuf::from("_posts"));
        assert_eq!(spec.object, "post");
        assert_eq!(spec.route_prefix, "blog/:year/:month/:day");
        assert_eq!(spec.sort, SortPolicy::new(SortKey::Date, SortOrder::Desc));
    }

    #[test]
    fn test_legacy_optional_convention() {
        assert!(CollectionSpec::new("post", "posts", "_posts").is_optional());
        assert!(!CollectionSpec::new("page", "pages", "_pages").is_optional());
    }

    #[test]
    fn test_explicit_optional_flag_wins() {
        let pages = CollectionSpec::new("page", "pages", "_pages").with_optional(true);
        assert!(pages.is_optional());

        let posts = CollectionSpec::posts().with_optional(false);
        assert!(!posts.is_optional());
    }

    #[test]
    fn test_related_collection_defaults_to_self() {
        let spec = CollectionSpec::new("lecture", "lectures", "_lectures");
        assert_eq!(spec.related_collection(), "lectures");

        let spec = spec.with_related_collection("posts");
        assert_eq!(spec.related_collection(), "posts");
    }

    #[test]
    fn test_sort_policy_deserialize() {
        let policy: SortPolicy = serde_yaml::from_str("by: title\norder: asc").expect("parse");
        assert_eq!(policy, SortPolicy::new(SortKey::Title, SortOrder::Asc));

        let policy: SortPolicy = serde_yaml::from_str("by: weight").expect("parse");
        assert_eq!(
            policy,
            SortPolicy::new(SortKey::Field("weight".to_string()), SortOrder::Desc)
        );
    }
}
