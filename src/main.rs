use anyhow::Result;
use clap::{Parser, Subcommand};

/// hearth - recipe to shopping list reconciliation
#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Turns recipe ingredients into a deduplicated shopping list", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = hearth::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    hearth::observability::init_observability(
        "hearth",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => hearth::cli::server::serve(config, host, port).await,
        Commands::Migrate => hearth::migrate::migrate(&config).await,
        Commands::Reset => hearth::migrate::reset(&config).await,
    }
}
