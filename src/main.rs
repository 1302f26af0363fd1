use clap::{Parser, Subcommand};
use stockroom::Result;
use stockroom::commands::{init_config, run_seed, run_serve, show_config, show_status};
use stockroom::config::Config;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Seed a vector-indexed product catalog and serve a retrieval chat endpoint")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Clear and re-seed the catalog collection with generated items
    Seed {
        /// Number of items to generate
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Start the HTTP chat server
    Serve {
        /// Override the configured server port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show collection and capability status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_default()?;

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config(&config)?;
            } else {
                init_config(&config)?;
            }
        }
        Commands::Seed { count } => {
            run_seed(&config, count).await?;
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            run_serve(&config).await?;
        }
        Commands::Status => {
            show_status(&config).await?;
        }
    }

    Ok(())
}
