//! Source file discovery.

use std::path::{Path, PathBuf};

use folio_core::content::extension_of;
use walkdir::{DirEntry, WalkDir};

use crate::error::{GeneratorError, Result};

/// Extensions picked up as generic renderable files.
pub const RENDERABLE_EXTENSIONS: &[&str] = &[
    "md", "markdown", "html", "htm", "twig", "latte", "xml", "rss", "txt",
];

/// Lists the files the generator works on.
pub trait FileDiscovery: Send + Sync {
    /// Every file below `dir`, in a stable order.
    fn find_in_directory(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Renderable files below `source_dir`, skipping the `excluded` directories.
    fn find_renderable_files(&self, source_dir: &Path, excluded: &[PathBuf])
    -> Result<Vec<PathBuf>>;
}

/// Filesystem discovery backed by `walkdir`.
///
/// Entries are sorted by file name and hidden entries (leading `.`) are
/// skipped along with everything below them.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkDiscovery;

impl WalkDiscovery {
    /// Create a walker.
    pub fn new() -> Self {
        Self
    }

    fn walk<F>(&self, root: &Path, mut keep_dir: F) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&DirEntry) -> bool,
    {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || (!is_hidden(entry) && (!entry.file_type().is_dir() || keep_dir(entry)))
            });

        for entry in walker {
            let entry = entry.map_err(|e| GeneratorError::Discovery {
                path: e.path().unwrap_or(root).to_path_buf(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

impl FileDiscovery for WalkDiscovery {
    fn find_in_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.walk(dir, |_| true)
    }

    fn find_renderable_files(
        &self,
        source_dir: &Path,
        excluded: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        let files = self.walk(source_dir, |entry| {
            !excluded.iter().any(|skip| entry.path() == skip.as_path())
        })?;

        Ok(files
            .into_iter()
            .filter(|path| {
                extension_of(path)
                    .is_some_and(|ext| RENDERABLE_EXTENSIONS.contains(&ext.as_str()))
            })
            .collect())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
