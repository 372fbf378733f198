//! Logs command - inspect the event log

use std::path::PathBuf;

use anyhow::Result;
use chainnotes_core::services::{EntryPoint, LogEntry, LogFilter, LoggingService};
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_app_dir;
use crate::output::{create_table, format_size, success};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only this event (e.g. note_failed)
        #[arg(long)]
        event: Option<String>,
        /// Only this network (gnosis, demo)
        #[arg(long)]
        network: Option<String>,
        /// Show only failures
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old entries
    Clear {
        /// Delete entries older than N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Show counts per event and the database location
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy the log database to a file for troubleshooting
    Export {
        /// Destination file
        path: PathBuf,
    },
}

fn open() -> Result<LoggingService> {
    LoggingService::new(&get_app_dir()?, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn print_entries(entries: &[LogEntry]) {
    let mut table = create_table();
    table.set_header(vec!["Time", "Event", "Network", "Command", "Error"]);
    for entry in entries {
        let event = if entry.error_message.is_some() {
            entry.event.red().to_string()
        } else {
            entry.event.clone()
        };
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            event,
            entry.network.clone().unwrap_or_default(),
            entry.command.clone().unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
}

pub fn run(command: LogsCommands) -> Result<()> {
    let service = open()?;

    match command {
        LogsCommands::List {
            limit,
            event,
            network,
            errors,
            json,
        } => {
            let filter = LogFilter {
                event,
                network,
                errors_only: errors,
            };
            let entries = service.search(&filter, limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("{}", "No log entries found".dimmed());
            } else {
                print_entries(&entries);
            }
        }
        LogsCommands::Clear {
            older_than_days,
            force,
        } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete log entries older than {} days?", older_than_days))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }

            let cutoff = Utc::now() - Duration::days(older_than_days as i64);
            let deleted = service.delete_before(cutoff.timestamp_millis())?;
            success(&format!("Deleted {} log entries", deleted));
        }
        LogsCommands::Stats { json } => {
            let counts = service.event_counts()?;
            let total = service.count()?;
            let db_path = service.db_path().to_path_buf();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "total_entries": total,
                        "events": counts,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Event Log".bold());
            println!("  {} entries, {}", total, format_size(size_bytes));
            println!("  {}", db_path.display().to_string().dimmed());

            if !counts.is_empty() {
                let mut table = create_table();
                table.set_header(vec!["Event", "Count", "Failed"]);
                for count in &counts {
                    table.add_row(vec![
                        count.event.clone(),
                        count.total.to_string(),
                        count.errors.to_string(),
                    ]);
                }
                println!("{}", table);
            }
        }
        LogsCommands::Export { path } => {
            let written = service.export(&path)?;
            success(&format!("Exported event log to {}", written.display()));
        }
    }

    Ok(())
}
