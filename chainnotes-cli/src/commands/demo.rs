//! Demo command - manage demo mode

use anyhow::Result;
use chainnotes_core::services::{DemoService, LogEvent};
use clap::Subcommand;
use colored::Colorize;

use super::{get_app_dir, get_logger, log_event};
use crate::output::{success, warning};

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode
    #[command(name = "on")]
    On,
    /// Disable demo mode
    #[command(name = "off")]
    Off {
        /// Also delete the demo chain
        #[arg(long)]
        clean: bool,
    },
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)?;
    let demo_service = DemoService::new(&app_dir);

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable()?;
            log_event(&get_logger(), LogEvent::new("demo_enabled").with_command("demo"));
            success("Demo mode enabled");
            println!("A demo account is logged in. Run 'cnotes notes' to see its notes.");
        }
        Some(DemoCommands::Off { clean }) => {
            demo_service.disable(clean)?;
            log_event(&get_logger(), LogEvent::new("demo_disabled").with_command("demo"));
            warning("Demo mode disabled");
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
        }
    }

    Ok(())
}
