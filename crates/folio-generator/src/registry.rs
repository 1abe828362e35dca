//! Run-scoped registry of collections and options.
//!
//! The registry is owned by the [`Generator`](crate::Generator) and handed to
//! decorators by shared reference; it is the only channel through which one
//! collection can see another.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;

use crate::object::CollectionObject;

/// Value stored under a registry key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegistryValue {
    /// An ordered collection of generated objects.
    Collection(Vec<CollectionObject>),
    /// Any other option.
    Setting(Value),
}

/// Key/value store exposed to decorators and the template stage.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GlobalRegistry {
    entries: BTreeMap<String, RegistryValue>,
}

impl GlobalRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an option, replacing any previous value under `key`.
    pub fn add_option(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), RegistryValue::Setting(value));
    }

    /// Store a collection, replacing any previous value under `key`.
    pub fn add_collection(&mut self, key: impl Into<String>, objects: Vec<CollectionObject>) {
        self.entries
            .insert(key.into(), RegistryValue::Collection(objects));
    }

    /// Raw entry by key.
    pub fn get(&self, key: &str) -> Option<&RegistryValue> {
        self.entries.get(key)
    }

    /// Collection by key; `None` when absent or not a collection.
    pub fn collection(&self, key: &str) -> Option<&[CollectionObject]> {
        match self.entries.get(key)? {
            RegistryValue::Collection(objects) => Some(objects),
            RegistryValue::Setting(_) => None,
        }
    }

    /// Option by key; `None` when absent or a collection.
    pub fn option(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key)? {
            RegistryValue::Setting(value) => Some(value),
            RegistryValue::Collection(_) => None,
        }
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
