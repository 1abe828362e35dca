//! Create-post command - scaffold a new dated collection file

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use folio_core::{CollectionSpec, Config};
use folio_parser::{FileParser, HeaderParser, markdown::slugify};
use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

/// Options of a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title, also the source of the slug.
    pub title: String,
    /// Publication date; today when not given.
    pub date: Option<NaiveDate>,
    /// Global variable of the target collection.
    pub collection: String,
}

/// Run the create-post command.
pub fn run(config_path: &Path, post: &NewPost) -> Result<()> {
    let path = create_post(config_path, post)?;
    println!("Created: {}", path.display());
    Ok(())
}

/// Write `YYYY-MM-DD-<slug>.md` with the next free id of the collection's
/// object kind and return its path.
pub fn create_post(config_path: &Path, post: &NewPost) -> Result<PathBuf> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let specs = config.collection_specs();
    let spec = specs
        .iter()
        .find(|spec| spec.variable_global == post.collection)
        .ok_or_else(|| eyre!("collection \"{}\" is not declared", post.collection))?;

    let slug = slugify(&post.title);
    if slug.is_empty() {
        bail!("title \"{}\" does not produce a usable slug", post.title);
    }

    let date = post.date.unwrap_or_else(|| Local::now().date_naive());
    let source_dir = &config.site.source_dir;
    let collection_dir = source_dir.join(&spec.path);

    let mut dir = collection_dir.clone();
    if is_nested_by_year(&collection_dir) {
        dir.push(date.format("%Y").to_string());
    }
    let path = dir.join(format!("{}-{slug}.md", date.format("%Y-%m-%d")));

    if path.exists() {
        bail!(
            "post \"{}\" already exists, change the title or date",
            path.display()
        );
    }

    let id = next_id(source_dir, &specs, &spec.object)?;
    let mut header = Mapping::new();
    header.insert(Value::from("id"), Value::from(id));
    header.insert(Value::from("title"), Value::from(post.title.as_str()));
    let header = serde_yaml::to_string(&header).wrap_err("Failed to serialize header")?;

    fs::create_dir_all(&dir).wrap_err("Failed to create directories")?;
    fs::write(&path, format!("---\n{header}---\n\nWrite your content here.\n"))
        .wrap_err("Failed to write file")?;

    tracing::info!(path = %path.display(), id, collection = %spec.variable_global, "created post");
    Ok(path)
}

/// Whether the collection keeps its files in per-year directories.
fn is_nested_by_year(collection_dir: &Path) -> bool {
    WalkDir::new(collection_dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .any(|entry| {
            let name = entry.file_name().to_string_lossy();
            !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
        })
}

/// One past the highest id used by any collection of the same object kind.
fn next_id(source_dir: &Path, specs: &[CollectionSpec], object: &str) -> Result<u64> {
    let parser = HeaderParser::new();
    let mut highest = 0;

    for spec in specs.iter().filter(|spec| spec.object == object) {
        let files = WalkDir::new(source_dir.join(&spec.path))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"));

        for entry in files {
            let source = parser
                .parse_file(entry.path())
                .wrap_err_with(|| format!("Failed to read {}", entry.path().display()))?;
            if let Some(id) = source.header_value("id").and_then(Value::as_u64) {
                highest = highest.max(id);
            }
        }
    }

    Ok(highest + 1)
}
