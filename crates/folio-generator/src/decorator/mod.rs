//! Decorators and the chain that applies them.
//!
//! A decorator declares a priority and exposes what it can decorate through
//! [`Decorator::as_file_decorator`] and [`Decorator::as_collection_decorator`].
//! The [`DecoratorChain`] orders decorators once, highest priority first, and
//! calls only the capability that matches the input.

mod excerpt;
mod markdown;
mod related;
mod route;

use std::cmp::Reverse;

pub use excerpt::ExcerptDecorator;
use folio_core::{CollectionSpec, Config};
pub use markdown::MarkdownDecorator;
pub use related::RelatedItemsDecorator;
pub use route::RouteDecorator;
use tracing::debug;

use crate::{
    error::Result,
    object::{CollectionObject, RenderableFile},
    registry::GlobalRegistry,
};

/// A transformation step of the generation pipeline.
pub trait Decorator: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Higher priorities run first.
    fn priority(&self) -> i32;

    /// File capability, if supported.
    fn as_file_decorator(&self) -> Option<&dyn FileDecorator> {
        None
    }

    /// Collection capability, if supported.
    fn as_collection_decorator(&self) -> Option<&dyn CollectionDecorator> {
        None
    }
}

/// Decorates generic renderable files.
pub trait FileDecorator {
    /// Transform the full set of files.
    fn decorate_files(
        &self,
        files: Vec<RenderableFile>,
        registry: &GlobalRegistry,
    ) -> Result<Vec<RenderableFile>>;
}

/// Decorates the objects of one collection.
pub trait CollectionDecorator {
    /// Transform the full sequence of a collection's objects.
    fn decorate_collection(
        &self,
        objects: Vec<CollectionObject>,
        spec: &CollectionSpec,
        registry: &GlobalRegistry,
    ) -> Result<Vec<CollectionObject>>;
}

/// Ordered set of decorators.
pub struct DecoratorChain {
    decorators: Vec<Box<dyn Decorator>>,
}

impl std::fmt::Debug for DecoratorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorChain")
            .field("decorators", &self.names())
            .finish()
    }
}

impl DecoratorChain {
    /// Build a chain; decorators are sorted by priority, highest first, keeping
    /// registration order among equal priorities.
    pub fn new(mut decorators: Vec<Box<dyn Decorator>>) -> Self {
        decorators.sort_by_key(|decorator| Reverse(decorator.priority()));
        Self { decorators }
    }

    /// Chain with the built-in decorators.
    pub fn with_defaults(config: &Config) -> Self {
        Self::new(vec![
            Box::new(MarkdownDecorator::new(&config.markdown)),
            Box::new(RouteDecorator::new()),
            Box::new(ExcerptDecorator::new()),
            Box::new(RelatedItemsDecorator::new()),
        ])
    }

    /// Decorator names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    /// Number of decorators.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// Whether the chain has no decorators.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Run every file decorator over `files`.
    pub fn apply_to_generic_files(
        &self,
        files: Vec<RenderableFile>,
        registry: &GlobalRegistry,
    ) -> Result<Vec<RenderableFile>> {
        if files.is_empty() {
            return Ok(files);
        }

        let mut files = files;
        for decorator in &self.decorators {
            if let Some(file_decorator) = decorator.as_file_decorator() {
                debug!(decorator = decorator.name(), count = files.len(), "decorating files");
                files = file_decorator.decorate_files(files, registry)?;
            }
        }
        Ok(files)
    }

    /// Run every collection decorator over one collection's objects.
    pub fn apply_to_collection(
        &self,
        objects: Vec<CollectionObject>,
        spec: &CollectionSpec,
        registry: &GlobalRegistry,
    ) -> Result<Vec<CollectionObject>> {
        if objects.is_empty() {
            return Ok(objects);
        }

        let mut objects = objects;
        for decorator in &self.decorators {
            if let Some(collection_decorator) = decorator.as_collection_decorator() {
                debug!(
                    decorator = decorator.name(),
                    collection = %spec.variable_global,
                    count = objects.len(),
                    "decorating collection"
                );
                objects = collection_decorator.decorate_collection(objects, spec, registry)?;
            }
        }
        Ok(objects)
    }
}
