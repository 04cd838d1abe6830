//! TechStore CLI - drive the checkout wizard and the shopping assistant.
//!
//! # Usage
//!
//! ```bash
//! # Place an order from a YAML script
//! techstore checkout --order crates/cli/demo/order.yaml
//!
//! # Print the placed order as YAML instead of the receipt
//! techstore checkout --order crates/cli/demo/order.yaml --yaml
//!
//! # Talk to the assistant (one reply per message)
//! techstore --seed 7 chat "¿Hacen envíos gratis?" "¿Aceptan PayPal?"
//!
//! # Rewrite a product description
//! techstore describe 3
//!
//! # Recommendations and catalog search
//! techstore recommend --category Electrónicos
//! techstore search laptop --price-band 1000-2000 --sort price-low
//! ```
//!
//! # Commands
//!
//! - `checkout` - Run a scripted order through the wizard
//! - `chat` - Send messages to the assistant
//! - `describe` - Generate a product description
//! - `recommend` - Suggest products
//! - `search` - Query the catalog
//!
//! Logs go to stderr; `RUST_LOG` overrides the default filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use techstore_storefront::catalog::Catalog;
use techstore_storefront::config::StorefrontConfig;
use techstore_storefront::services::assistant::MockAssistant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "techstore")]
#[command(author, version, about = "TechStore checkout and shopping assistant")]
struct Cli {
    /// Catalog YAML file (defaults to the bundled demo catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Seed for the assistant's random choices
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted order through the checkout wizard
    Checkout {
        /// Order script (YAML)
        #[arg(short, long)]
        order: PathBuf,

        /// Print the placed order as YAML instead of the receipt
        #[arg(long)]
        yaml: bool,
    },
    /// Send messages to the shopping assistant
    Chat {
        /// Messages, sent in order
        #[arg(required = true)]
        messages: Vec<String>,
    },
    /// Generate a description for a product
    Describe {
        /// Product ID
        product_id: String,
    },
    /// Suggest products
    Recommend {
        /// Preferred categories
        #[arg(short, long)]
        category: Vec<String>,

        /// Products already viewed (names)
        #[arg(long)]
        viewed: Vec<String>,
    },
    /// Search the catalog
    Search {
        /// Search text (name, description, tags)
        #[arg(default_value = "")]
        query: String,

        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,

        /// `all`, `under-500`, `500-1000`, `1000-2000`, `over-2000`
        #[arg(long, default_value = "all")]
        price_band: String,

        /// `featured`, `price-low`, `price-high`, `rating`, `name`
        #[arg(long, default_value = "featured")]
        sort: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env first so RUST_LOG set there applies
    dotenvy::dotenv().ok();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "techstore_storefront=info,techstore_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> techstore_storefront::Result<()> {
    let config = StorefrontConfig::from_env()?;
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::demo()?,
    };
    let assistant = match cli.seed {
        Some(seed) => MockAssistant::seeded(&config.assistant, seed),
        None => MockAssistant::new(&config.assistant),
    };

    match cli.command {
        Commands::Checkout { order, yaml } => {
            commands::checkout::run(&catalog, &config, &order, yaml).await?;
        }
        Commands::Chat { messages } => commands::assistant::chat(&assistant, &messages).await?,
        Commands::Describe { product_id } => {
            commands::assistant::print_description(&assistant, catalog, &product_id).await?;
        }
        Commands::Recommend { category, viewed } => {
            commands::assistant::recommend(&assistant, &catalog, category, viewed).await?;
        }
        Commands::Search {
            query,
            category,
            price_band,
            sort,
        } => {
            commands::assistant::search(&assistant, &catalog, query, category, &price_band, &sort)
                .await?;
        }
    }
    Ok(())
}
