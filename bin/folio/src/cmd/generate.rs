//! Generate command - builds collections and renderable files

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;
use folio_generator::{GeneratedCollections, Generator, GlobalRegistry, RenderableFile};
use serde::Serialize;

/// Everything a generation run hands to the template stage.
#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    /// Decorated collections keyed by global variable.
    pub collections: GeneratedCollections,
    /// Registry contents: collections and options.
    pub registry: GlobalRegistry,
    /// Decorated generic renderable files.
    pub files: Vec<RenderableFile>,
}

/// Load the configuration and run the full pipeline.
pub fn generate(config_path: &Path) -> Result<GenerateOutput> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");

    let mut generator = Generator::from_config(config);
    let collections = generator
        .run()
        .wrap_err("Collection generation failed")?
        .clone();
    let files = generator
        .process_renderable_files()
        .wrap_err("Processing renderable files failed")?;

    Ok(GenerateOutput {
        collections,
        registry: generator.registry().clone(),
        files,
    })
}

/// Run the generate command.
///
/// Prints a summary, or the generated data as JSON when `json` is set.
pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, json, "Starting generation");

    let output = generate(config_path)?;

    if json {
        let dump = serde_json::to_string_pretty(&output).wrap_err("Failed to serialize output")?;
        println!("{dump}");
        return Ok(());
    }

    let duration = start.elapsed();

    println!();
    println!("  Generation completed successfully!");
    println!();
    for (name, objects) in output.collections.iter() {
        println!("  {name:<12} {}", objects.len());
    }
    println!("  {:<12} {}", "files", output.files.len());
    println!();
    println!("  Duration:    {:.2}s", duration.as_secs_f64());
    println!();

    tracing::info!(
        collections = output.collections.len(),
        objects = output.collections.object_count(),
        files = output.files.len(),
        ?duration,
        "Generation completed successfully"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "folio.toml",
            "[site]\ntitle = \"Test\"\n\n[options]\nauthor = \"Jane\"\n",
        );
        write(
            dir.path(),
            "source/_posts/2024-05-01-hello.md",
            "---\nid: 1\ntitle: Hello\n---\nHi",
        );
        write(dir.path(), "source/index.twig", "home");

        let output = generate(&dir.path().join("folio.toml")).unwrap();
        assert_eq!(output.collections.object_count(), 1);
        assert_eq!(output.files.len(), 1);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["collections"]["posts"][0]["id"], 1);
        assert_eq!(
            json["collections"]["posts"][0]["relative_url"],
            "/blog/2024/05/01/hello/"
        );
        assert_eq!(json["registry"]["author"], "Jane");
    }

    #[test]
    fn test_generate_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(generate(&dir.path().join("missing.toml")).is_err());
    }
}
