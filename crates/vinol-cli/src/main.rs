use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vinol_core::Category;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "vinol")]
#[command(about = "Untappd and Hachette ratings for Systembolaget beer and wine")]
struct Cli {
    /// Print results as JSON instead of one line per product
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up ratings for one or more product pages, one at a time
    Lookup {
        /// Product page URLs (absolute, or paths on the retailer site)
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Look up every beer and wine linked from a listing page
    Scan {
        /// Listing page URL
        url: String,
    },
    /// Print the rating-site search URL for a product without fetching anything
    SearchUrl {
        /// `beer` or `wine`
        #[arg(long)]
        category: Category,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        producer: String,
        #[arg(long, default_value = "")]
        vintage: String,
        /// Second-level retailer category, e.g. "Rött" or "Mousserande"
        #[arg(long, default_value = "")]
        subcategory: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = vinol_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Lookup { urls } => commands::run_lookup(&config, &urls, cli.json).await,
        Commands::Scan { url } => commands::run_scan(&config, &url, cli.json).await,
        Commands::SearchUrl {
            category,
            name,
            producer,
            vintage,
            subcategory,
        } => {
            let identity = vinol_core::ProductIdentity {
                name,
                producer,
                vintage,
                category,
                subcategory,
                url: String::new(),
            };
            commands::print_search_url(&config, &identity);
            Ok(())
        }
    }
}
