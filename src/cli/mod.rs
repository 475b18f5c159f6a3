pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "aion")]
#[command(about = "AION CLI - Run the API server or trigger notification sweeps")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to bind (overrides AION_API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Run notification sweeps once with service credentials")]
    Sweep {
        #[command(subcommand)]
        cmd: commands::sweep::SweepCommands,
    },

    #[command(about = "Inspect the resolved configuration")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Sweep { cmd } => commands::sweep::handle(cmd, output_format).await,
        Commands::Config { cmd } => commands::config::handle(cmd, output_format),
    }
}
