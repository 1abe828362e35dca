//! Check command - validate configuration and collection sources

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::Config;
use folio_generator::Generator;

/// Run the check command.
///
/// Loads the configuration and runs the collection pipeline without writing
/// anything. The first error is reported and fails the command.
pub fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Checking configuration and collections");

    println!("Checking configuration...");
    let config = Config::load_with_env(config_path).wrap_err("Configuration invalid")?;
    println!("  ✓ Configuration valid");

    for warning in config_warnings(&config) {
        println!("  ⚠ {warning}");
    }

    println!("\nChecking collections...");
    let mut generator = Generator::from_config(config);
    let generated = match generator.run() {
        Ok(generated) => generated,
        Err(e) => {
            println!("  ✗ {e}");
            bail!("Check failed: {e}");
        }
    };

    for (name, objects) in generated.iter() {
        println!("  ✓ {name}: {} object(s)", objects.len());
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Non-fatal configuration issues.
fn config_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.site.title.is_empty() {
        warnings.push("site.title is empty".to_string());
    }

    if !config.site.source_dir.is_dir() {
        warnings.push(format!(
            "source directory {} does not exist",
            config.site.source_dir.display()
        ));
    }

    if config.collections.is_empty() {
        warnings.push("no collections declared; using the default posts collection".to_string());
    }

    warnings
}
