//! ChainNotes CLI - public notes on Gnosis Chain from your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod output;

use commands::{authorize, demo, login, logout, logs, notes, post, status};

/// ChainNotes - public notes on Gnosis Chain
#[derive(Parser)]
#[command(name = "cnotes", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show network, configuration and session status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in with a GetLogin session key and username
    Login {
        /// Session private key (prompted if omitted)
        #[arg(long, env = "CHAINNOTES_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
        /// GetLogin username (prompted if omitted)
        #[arg(long, short)]
        username: Option<String>,
        /// Return link from the GetLogin app carrying privateKey and username
        #[arg(long, conflicts_with_all = ["private_key", "username"])]
        link: Option<String>,
    },

    /// Forget the stored session
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// List your notes, newest first
    Notes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a note to the chain and wait for its confirmation
    Post {
        /// Note text (prompted if omitted)
        text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the GetLogin install and authorize links
    Authorize {
        /// Store to link to (ios, android)
        #[arg(long)]
        platform: Option<String>,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json).await,
        Commands::Login {
            private_key,
            username,
            link,
        } => login::run(private_key, username, link).await,
        Commands::Logout { force } => logout::run(force),
        Commands::Notes { json } => notes::run(json).await,
        Commands::Post { text, json } => post::run(text, json).await,
        Commands::Authorize { platform } => authorize::run(platform.as_deref()),
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
