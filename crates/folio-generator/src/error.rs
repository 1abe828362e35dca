//! Generation errors.
//!
//! Every variant is fatal: the first violation aborts the run.

use std::path::PathBuf;

use thiserror::Error;

use crate::object::ObjectKind;

/// Generation errors.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A required collection directory does not exist.
    #[error("path \"{path}\" for generated collection \"{collection}\" was not found")]
    MissingPath { path: PathBuf, collection: String },

    /// Two collections share a global variable name.
    #[error("collection for \"{variable}\" global variable already exists")]
    DuplicateCollection { variable: String },

    /// The configured object kind is not a generated object kind.
    #[error("\"{kind}\" is not a generated object kind (expected one of: {expected})")]
    InvalidObjectKind { kind: String, expected: String },

    /// A source file has no usable `id` in its header.
    #[error("file \"{path}\" must have \"id: [0-9]+\" in its header block")]
    MissingId { path: PathBuf },

    /// An id was used twice within one object kind.
    #[error(
        "id \"{id}\" was already set for \"{kind}\" objects; pick another one for \"{path}\""
    )]
    DuplicateId {
        id: u64,
        kind: ObjectKind,
        path: PathBuf,
    },

    /// A route placeholder could not be filled for an object.
    #[error("route placeholder \"{placeholder}\" cannot be resolved for \"{path}\": object has no date")]
    UnresolvedRoute { path: PathBuf, placeholder: String },

    /// A source file could not be read or its header parsed.
    #[error("parse error: {0}")]
    Parse(#[from] folio_parser::ParserError),

    /// Walking a source directory failed.
    #[error("failed to walk {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    /// A decorator failed.
    #[error("decorator \"{decorator}\" failed: {message}")]
    Decorator {
        decorator: &'static str,
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
