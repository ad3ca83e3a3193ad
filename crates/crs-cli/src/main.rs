use clap::{Parser, Subcommand};
use crs_cli::Config;
use crs_server::{AppState, CrsServer, NullExternalServices, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "crs", version, about = "Code Reasoning State agent")]
struct Cli {
    /// Path to a TOML config file; falls back to defaults + environment if absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server.
    Serve,
    /// Print the resolved configuration and exit, without starting anything.
    PrintConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crs_cli::init_tracing();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve => {
            tracing::info!(bind_addr = %config.bind_addr, "starting code reasoning state server");
            let state = AppState::new(Arc::new(NullExternalServices), config.budget());
            let server = CrsServer::new(ServerConfig { bind_addr: config.bind_addr }, state);
            server.serve().await?;
        }
        Command::PrintConfig => {
            println!("{config:#?}");
        }
    }

    Ok(())
}
