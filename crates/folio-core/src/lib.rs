//! Folio Core Library
//!
//! Core types, configuration, and error handling for the Folio collection generator.

pub mod collection;
pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use collection::{CollectionSpec, SortKey, SortOrder, SortPolicy};
pub use config::Config;
pub use content::{ContentType, SourceFile};
pub use error::{CoreError, Result};
