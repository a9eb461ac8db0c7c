//! `FoodPi` Hub CLI - app icon and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Rasterize the SVG logo
//! fp-cli icons convert --svg crates/storefront/static/images/logo.svg \
//!     --out crates/storefront/static/images/logo.png
//!
//! # Generate manifest icons from the PNG logo
//! fp-cli icons generate --source crates/storefront/static/images/logo.png \
//!     --out-dir crates/storefront/static/images/icons
//!
//! # Both, in order
//! fp-cli icons all
//!
//! # Validate a restaurant catalog
//! fp-cli catalog check catalog.yaml
//! ```
//!
//! # Commands
//!
//! - `icons` - Produce the PNG icons listed in the web app manifest
//! - `catalog check` - Parse and validate a catalog YAML file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

const DEFAULT_SVG: &str = "crates/storefront/static/images/logo.svg";
const DEFAULT_PNG: &str = "crates/storefront/static/images/logo.png";
const DEFAULT_ICON_DIR: &str = "crates/storefront/static/images/icons";

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(author, version, about = "FoodPi Hub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce app icons
    Icons {
        #[command(subcommand)]
        action: IconAction,
    },
    /// Work with restaurant catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum IconAction {
    /// Rasterize the SVG logo to PNG
    Convert {
        /// Source SVG
        #[arg(long, default_value = DEFAULT_SVG)]
        svg: PathBuf,

        /// Output PNG
        #[arg(long, default_value = DEFAULT_PNG)]
        out: PathBuf,

        /// Output width and height in pixels
        #[arg(long, default_value_t = commands::icons::DEFAULT_LOGO_SIZE)]
        size: u32,
    },
    /// Generate every manifest icon size from the PNG logo
    Generate {
        /// Source PNG
        #[arg(long, default_value = DEFAULT_PNG)]
        source: PathBuf,

        /// Output directory (created if missing)
        #[arg(long, default_value = DEFAULT_ICON_DIR)]
        out_dir: PathBuf,
    },
    /// Convert, then generate
    All {
        /// Source SVG
        #[arg(long, default_value = DEFAULT_SVG)]
        svg: PathBuf,

        /// Intermediate PNG
        #[arg(long, default_value = DEFAULT_PNG)]
        png: PathBuf,

        /// Output directory (created if missing)
        #[arg(long, default_value = DEFAULT_ICON_DIR)]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Parse and validate a catalog YAML file
    Check {
        /// Catalog file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error + Send + Sync>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cli.command {
        Commands::Icons { action } => {
            // Image work is CPU-bound
            tokio::task::spawn_blocking(move || run_icons(action)).await??;
        }
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => {
                commands::catalog::check(&path).map_err(|e| e.to_string())?;
            }
        },
    }
    Ok(())
}

fn run_icons(action: IconAction) -> Result<(), commands::icons::IconError> {
    match action {
        IconAction::Convert { svg, out, size } => commands::icons::convert(&svg, &out, size),
        IconAction::Generate { source, out_dir } => {
            commands::icons::generate(&source, &out_dir).map(|_| ())
        }
        IconAction::All { svg, png, out_dir } => {
            commands::icons::convert(&svg, &png, commands::icons::DEFAULT_LOGO_SIZE)?;
            commands::icons::generate(&png, &out_dir).map(|_| ())
        }
    }
}
