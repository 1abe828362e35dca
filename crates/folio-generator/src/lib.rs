//! Folio Generator Library
//!
//! Collection generation pipeline for Folio.
//!
//! # Modules
//!
//! - [`guard`] - Object kind and id checks
//! - [`factory`] - Collection objects and renderable files from parsed sources
//! - [`decorator`] - Decorator traits, the decorator chain and built-in decorators
//! - [`sorter`] - Collection ordering
//! - [`registry`] - Run-scoped registry of collections and options
//! - [`discovery`] - Source file discovery
//! - [`generator`] - Generation orchestration

pub mod decorator;
pub mod discovery;
pub mod error;
pub mod factory;
pub mod generator;
pub mod guard;
pub mod object;
pub mod registry;
pub mod sorter;

pub use decorator::{
    CollectionDecorator, Decorator, DecoratorChain, ExcerptDecorator, FileDecorator,
    MarkdownDecorator, RelatedItemsDecorator, RouteDecorator,
};
pub use discovery::{FileDiscovery, WalkDiscovery};
pub use error::{GeneratorError, Result};
pub use factory::{FileFactory, ObjectFactory};
pub use generator::{GeneratedCollections, Generator};
pub use guard::IdentityGuard;
pub use object::{CollectionObject, FieldLookup, FieldNotFound, ObjectKind, RenderableFile};
pub use registry::{GlobalRegistry, RegistryValue};
pub use sorter::CollectionSorter;
