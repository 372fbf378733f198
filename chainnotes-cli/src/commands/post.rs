//! Post command - write a note and wait for its confirmation

use std::time::Duration;

use anyhow::Result;
use chainnotes_core::services::LogEvent;
use chainnotes_core::WriteState;
use colored::Colorize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use super::{get_context, get_logger, log_event, logged_in_board};

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn run(text: Option<String>, json: bool) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => Input::new().with_prompt("Note").interact_text()?,
    };

    let ctx = get_context()?;
    let mut board = logged_in_board(&ctx).await?;
    let logger = get_logger();
    let network = board.network().to_string();

    let progress = if json { ProgressBar::hidden() } else { spinner() };
    let result = board
        .submit_with(&text, |state| {
            if let Some(line) = state.status_text() {
                progress.set_message(line);
            }
            if let WriteState::AwaitingConfirmation { tx_hash } = state {
                progress.println(format!("Transaction {:?}", tx_hash));
            }
        })
        .await;
    progress.finish_and_clear();

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("note_failed")
                    .with_command("post")
                    .with_network(&network)
                    .with_error(e.display_message()),
            );
            return Err(e.into());
        }
    };

    log_event(
        &logger,
        LogEvent::new("note_confirmed")
            .with_command("post")
            .with_network(&network),
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "tx_hash": format!("{:?}", receipt.tx_hash),
                "block_number": receipt.block_number,
                "notes": board.feed().len(),
            }))?
        );
        return Ok(());
    }

    println!("{} {}", "✓".green(), board.status().unwrap_or("Sent!"));
    if let Some(block) = receipt.block_number {
        println!("  Included in block {}", block);
    }
    if let Some(error) = board.error() {
        println!("{} {}", "Could not reload notes:".yellow(), error);
    }

    Ok(())
}
