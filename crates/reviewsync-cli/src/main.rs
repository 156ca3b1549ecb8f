mod harvest;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "reviewsync-cli")]
#[command(about = "Harvest profile reviews and sync them to the record store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Harvest the configured source once (the default when no command is given)
    Harvest {
        /// Profile reviews URL; defaults to `REVIEWSYNC_SOURCE_URL`
        #[arg(long)]
        url: Option<String>,
        /// Harvest and log the records without writing to the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = reviewsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Config) => harvest::print_config(&config),
        Some(Commands::Harvest { url, dry_run }) => {
            harvest::run_harvest(&config, url.as_deref(), dry_run).await?;
        }
        None => harvest::run_harvest(&config, None, false).await?,
    }

    Ok(())
}
