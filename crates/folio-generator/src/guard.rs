//! Structural and identity checks for generated objects.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use serde_yaml::{Mapping, Value};
use tracing::trace;

use crate::{
    error::{GeneratorError, Result},
    object::ObjectKind,
};

/// Read a well-formed, non-negative integer `id` from a header.
pub fn header_id(header: Option<&Mapping>) -> Option<u64> {
    header?.get("id").and_then(Value::as_u64)
}

/// Enforces object kind validity and per-kind id uniqueness.
///
/// Only the id registry carries state; it lives for one generation run.
#[derive(Debug, Default)]
pub struct IdentityGuard {
    ids_by_kind: HashMap<ObjectKind, HashSet<u64>>,
}

impl IdentityGuard {
    /// Create a guard with no ids recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag must name a recognised object kind.
    pub fn ensure_is_object_kind(&self, kind: &str) -> Result<ObjectKind> {
        kind.parse()
    }

    /// Record `id` for `kind`, failing if it was already recorded.
    pub fn ensure_id_is_unique(&mut self, id: u64, kind: ObjectKind, path: &Path) -> Result<()> {
        if self.ids_by_kind.entry(kind).or_default().insert(id) {
            trace!(id, %kind, "recorded id");
            return Ok(());
        }

        Err(GeneratorError::DuplicateId {
            id,
            kind,
            path: path.to_path_buf(),
        })
    }

    /// The raw header must carry an `id`; returns it.
    pub fn ensure_id_is_set(&self, path: &Path, header: Option<&Mapping>) -> Result<u64> {
        header_id(header).ok_or_else(|| GeneratorError::MissingId {
            path: path.to_path_buf(),
        })
    }

    /// Forget every recorded id.
    pub fn reset(&mut self) {
        self.ids_by_kind.clear();
    }
}
