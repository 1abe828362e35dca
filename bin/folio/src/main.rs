//! Folio CLI
//!
//! Generates the collections of a static site and checks its sources.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Folio.
#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Collection generator for static sites"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "folio.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate collections and renderable files
    Generate {
        /// Print the generated data as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Validate configuration and collection sources
    Check,
    /// Create a new dated post with the next free id
    CreatePost {
        /// Post title
        title: String,
        /// Publication date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
        /// Global variable of the target collection
        #[arg(long, default_value = "posts")]
        collection: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    folio::init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { json } => {
            folio::cmd::generate::run(&cli.config, json)?;
        }
        Commands::Check => {
            folio::cmd::check::run(&cli.config)?;
        }
        Commands::CreatePost {
            title,
            date,
            collection,
        } => {
            let post = folio::cmd::create_post::NewPost {
                title,
                date,
                collection,
            };
            folio::cmd::create_post::run(&cli.config, &post)?;
        }
    }

    Ok(())
}
