mod extract;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "passport-cli")]
#[command(about = "Extract product passports and search listings from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract one or more product pages and print their passports as JSON
    Extract {
        /// Product page URLs (Amazon, Walmart, Target, eBay)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Read the page from a saved HTML file instead of fetching it (single URL only)
        #[arg(long)]
        html: Option<PathBuf>,

        /// Maximum number of pages fetched at once
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Extract a search or listing page and print its items as JSON
    Search {
        /// Search or listing URL on any storefront
        url: String,

        /// Parse a saved HTML file instead of querying the remote tiers
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = passport_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Commands::Extract {
            urls,
            html,
            concurrency,
        } => {
            let html = read_html(html.as_ref()).await?;
            extract::run_extract(&config, &urls, html, concurrency).await?
        }
        Commands::Search { url, html } => {
            let html = read_html(html.as_ref()).await?;
            search::run_search(&config, &url, html).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn read_html(path: Option<&PathBuf>) -> anyhow::Result<Option<String>> {
    match path {
        Some(path) => {
            let html = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
            Ok(Some(html))
        }
        None => Ok(None),
    }
}
