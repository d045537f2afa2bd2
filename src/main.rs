use anyhow::Result;
use clap::{Parser, Subcommand};

/// smartmenu - Weekly lunch menus, shopping lists and nutrition reports
#[derive(Parser)]
#[command(name = "smartmenu")]
#[command(about = "Generate lunch menus and the shopping lists that go with them", long_about = None)]
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
    /// Load and validate the configuration, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = smartmenu::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    smartmenu::observability::init_observability(
        "smartmenu",
        env!("CARGO_PKG_VERSION"),
        &config.observability,
    )?;

    match cli.command {
        Commands::Serve { host, port } => smartmenu::server::serve(config, host, port).await,
        Commands::CheckConfig => {
            tracing::info!(
                generation = %config.generation.provider,
                email = %config.email.provider,
                "Configuration is valid"
            );
            Ok(())
        }
    }
}
