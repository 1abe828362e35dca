//! Site configuration management.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    collection::CollectionSpec,
    error::{CoreError, Result},
};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Markdown conversion settings.
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Declared collections; the stock `posts` collection when empty.
    #[serde(default)]
    pub collections: Vec<CollectionSpec>,

    /// Free-form options published to the registry before generation.
    #[serde(default)]
    pub options: BTreeMap<String, serde_yaml::Value>,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    #[serde(default)]
    pub title: String,

    /// Directory holding the source tree.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
}

/// Markdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Header fields converted from Markdown alongside the body.
    #[serde(default = "default_markup_fields")]
    pub markup_fields: Vec<String>,

    /// Whether headings receive `id` attributes and self-links.
    #[serde(default)]
    pub headline_anchors: bool,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("source")
}

fn default_markup_fields() -> Vec<String> {
    vec!["perex".to_string()]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            source_dir: default_source_dir(),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            markup_fields: default_markup_fields(),
            headline_anchors: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.resolve_source_dir(path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `FOLIO__` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.resolve_source_dir(path);
        config.validate()?;
        Ok(config)
    }

    /// Declared collections, falling back to the stock `posts` collection.
    pub fn collection_specs(&self) -> Vec<CollectionSpec> {
        if self.collections.is_empty() {
            vec![CollectionSpec::posts()]
        } else {
            self.collections.clone()
        }
    }

    /// Make a relative source directory relative to the config file.
    fn resolve_source_dir(&mut self, config_path: &Path) {
        if self.site.source_dir.is_relative()
            && let Some(parent) = config_path.parent()
        {
            self.site.source_dir = parent.join(&self.site.source_dir);
        }
    }

    /// Validate the configuration.
    ///
    /// Duplicate variable names are left to the generator, which reports them
    /// with the offending collection.
    fn validate(&self) -> Result<()> {
        for (index, spec) in self.collections.iter().enumerate() {
            if spec.variable_global.is_empty() {
                return Err(CoreError::config(format!(
                    "collections[{index}].variable_global cannot be empty"
                )));
            }

            if spec.path.as_os_str().is_empty() {
                return Err(CoreError::config(format!(
                    "collections[{index}].path cannot be empty"
                )));
            }
        }

        if self.site.title.is_empty() {
            tracing::warn!("site.title is empty");
        }

        Ok(())
    }
}
