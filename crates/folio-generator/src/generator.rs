//! Generation orchestration.
//!
//! The [`Generator`] turns every declared collection into a decorated, sorted
//! sequence of objects and publishes it in the [`GlobalRegistry`].

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Instant,
};

use folio_core::{CollectionSpec, Config, SourceFile};
use folio_parser::{FileParser, HeaderParser, ParserError};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    decorator::DecoratorChain,
    discovery::{FileDiscovery, WalkDiscovery},
    error::{GeneratorError, Result},
    factory::{FileFactory, ObjectFactory},
    object::{CollectionObject, RenderableFile},
    registry::GlobalRegistry,
    sorter::CollectionSorter,
};

/// Directories under the source root that never hold renderable files.
pub const RESERVED_DIRS: &[&str] = &["_layouts", "_snippets"];

/// Decorated, sorted collections keyed by their global variable.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GeneratedCollections {
    collections: BTreeMap<String, Vec<CollectionObject>>,
}

impl GeneratedCollections {
    /// Objects of one collection.
    pub fn get(&self, variable_global: &str) -> Option<&[CollectionObject]> {
        self.collections.get(variable_global).map(Vec::as_slice)
    }

    /// Collections in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CollectionObject])> {
        self.collections
            .iter()
            .map(|(key, objects)| (key.as_str(), objects.as_slice()))
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether no collection was generated.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Number of objects across all collections.
    pub fn object_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Top-level orchestrator of a generation run.
pub struct Generator {
    config: Config,
    discovery: Box<dyn FileDiscovery>,
    parser: Box<dyn FileParser>,
    chain: DecoratorChain,
    sorter: CollectionSorter,
    factory: ObjectFactory,
    registry: GlobalRegistry,
    generated: Option<GeneratedCollections>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("source_dir", &self.config.site.source_dir)
            .field("chain", &self.chain)
            .field("generated", &self.generated.is_some())
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Create a generator from its collaborators.
    pub fn new(
        config: Config,
        discovery: Box<dyn FileDiscovery>,
        parser: Box<dyn FileParser>,
        chain: DecoratorChain,
    ) -> Self {
        Self {
            config,
            discovery,
            parser,
            chain,
            sorter: CollectionSorter::new(),
            factory: ObjectFactory::new(),
            registry: GlobalRegistry::new(),
            generated: None,
        }
    }

    /// Create a generator with filesystem discovery, the header parser and the
    /// built-in decorators.
    pub fn from_config(config: Config) -> Self {
        let chain = DecoratorChain::with_defaults(&config);
        Self::new(
            config,
            Box::new(WalkDiscovery::new()),
            Box::new(HeaderParser::new()),
            chain,
        )
    }

    /// Configuration of this generator.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registry of the current run.
    pub fn registry(&self) -> &GlobalRegistry {
        &self.registry
    }

    /// Generate every collection.
    ///
    /// The first successful call caches its result; later calls return it
    /// without discovering or decorating anything again.
    pub fn run(&mut self) -> Result<&GeneratedCollections> {
        let generated = match self.generated.take() {
            Some(generated) => generated,
            None => self.generate()?,
        };
        let generated: &GeneratedCollections = self.generated.insert(generated);
        Ok(generated)
    }

    fn generate(&mut self) -> Result<GeneratedCollections> {
        let start = Instant::now();
        self.registry.clear();
        self.factory.reset();

        for (key, value) in &self.config.options {
            self.registry.add_option(key.as_str(), value.clone());
        }

        let specs = self.config.collection_specs();
        let source_dir = self.config.site.source_dir.clone();
        info!(
            source = %source_dir.display(),
            collections = specs.len(),
            "generating collections"
        );

        // Every collection is registered undecorated first, so decorators of
        // one collection can read the others.
        let mut raw = Vec::with_capacity(specs.len());
        for spec in &specs {
            let objects = self.create_objects(spec, &source_dir)?;
            if let Some(objects) = &objects {
                self.registry
                    .add_collection(spec.variable_global.as_str(), objects.clone());
            }
            raw.push(objects.unwrap_or_default());
        }

        let mut collections = BTreeMap::new();
        for (spec, objects) in specs.iter().zip(raw) {
            let key = spec.variable_global.as_str();
            if collections.contains_key(key) {
                return Err(GeneratorError::DuplicateCollection {
                    variable: key.to_string(),
                });
            }

            let objects = self.chain.apply_to_collection(objects, spec, &self.registry)?;
            let objects = self.sorter.sort(objects, &spec.sort);
            info!(collection = key, objects = objects.len(), "collection generated");

            self.registry.add_collection(key, objects.clone());
            collections.insert(key.to_string(), objects);
        }

        info!(
            collections = collections.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation complete"
        );
        Ok(GeneratedCollections { collections })
    }

    /// Build the raw objects of one collection; `None` when an optional
    /// collection has no directory.
    fn create_objects(
        &mut self,
        spec: &CollectionSpec,
        source_dir: &Path,
    ) -> Result<Option<Vec<CollectionObject>>> {
        let path = source_dir.join(&spec.path);
        if !path.is_dir() {
            if spec.is_optional() {
                debug!(
                    collection = %spec.variable_global,
                    path = %path.display(),
                    "skipping optional collection without directory"
                );
                return Ok(None);
            }
            return Err(GeneratorError::MissingPath {
                path,
                collection: spec.variable_global.clone(),
            });
        }

        let files = self.discovery.find_in_directory(&path)?;
        debug!(collection = %spec.variable_global, files = files.len(), "found collection files");

        // The factory validates the object kind even when no file was found.
        let sources = parse_files(self.parser.as_ref(), &files, source_dir)
            .into_iter()
            .zip(&files)
            .map(|(parsed, path)| parsed.map_err(|err| header_error(err, path)))
            .collect::<Result<Vec<_>>>()?;
        self.factory.create(sources, spec).map(Some)
    }

    /// Discover, parse and decorate the generic renderable files.
    ///
    /// Collections are generated first so file decorators see them in the
    /// registry.
    pub fn process_renderable_files(&mut self) -> Result<Vec<RenderableFile>> {
        self.run()?;

        let source_dir = self.config.site.source_dir.clone();
        let excluded: Vec<PathBuf> = self
            .config
            .collection_specs()
            .iter()
            .map(|spec| source_dir.join(&spec.path))
            .chain(RESERVED_DIRS.iter().map(|dir| source_dir.join(dir)))
            .collect();

        let paths = self.discovery.find_renderable_files(&source_dir, &excluded)?;
        info!(files = paths.len(), "processing renderable files");

        let sources = parse_files(self.parser.as_ref(), &paths, &source_dir)
            .into_iter()
            .map(|parsed| parsed.map_err(GeneratorError::from))
            .collect::<Result<Vec<_>>>()?;
        let files = FileFactory::new().create(sources);
        self.chain.apply_to_generic_files(files, &self.registry)
    }
}

/// Parse files in parallel; results keep discovery order.
fn parse_files(
    parser: &dyn FileParser,
    paths: &[PathBuf],
    source_dir: &Path,
) -> Vec<std::result::Result<SourceFile, ParserError>> {
    paths
        .par_iter()
        .map(|path| -> std::result::Result<SourceFile, ParserError> {
            let file = parser.parse_file(path)?;
            let relative = path.strip_prefix(source_dir).unwrap_or(path);
            Ok(file.with_relative_path(relative))
        })
        .collect()
}

/// A collection file whose header block cannot be read has no usable id.
fn header_error(err: ParserError, path: &Path) -> GeneratorError {
    match err {
        ParserError::Header(source) => {
            warn!(path = %path.display(), error = %source, "malformed header block");
            GeneratorError::MissingId {
                path: path.to_path_buf(),
            }
        }
        other => other.into(),
    }
}
