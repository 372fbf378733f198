//! Login command - bind a GetLogin session key to its username

use anyhow::Result;
use chainnotes_core::services::{parse_callback, LogEvent};
use chainnotes_core::Credentials;
use colored::Colorize;
use dialoguer::{Input, Password};

use super::{get_context, get_logger, log_event};

fn prompt_credentials(private_key: Option<String>, username: Option<String>) -> Result<Credentials> {
    let private_key = match private_key {
        Some(key) => key,
        None => Password::new()
            .with_prompt("Session private key")
            .interact()?,
    };
    let username = match username {
        Some(name) => name,
        None => Input::new().with_prompt("GetLogin username").interact_text()?,
    };
    Ok(Credentials::new(private_key, username))
}

pub async fn run(
    private_key: Option<String>,
    username: Option<String>,
    link: Option<String>,
) -> Result<()> {
    let credentials = match link {
        Some(link) => parse_callback(&link)?,
        None => prompt_credentials(private_key, username)?,
    };

    let ctx = get_context()?;
    let mut board = ctx.board()?;
    let logger = get_logger();
    let network = board.network().to_string();

    match board.login(credentials).await {
        Ok(()) => {
            log_event(
                &logger,
                LogEvent::new("login_succeeded")
                    .with_command("login")
                    .with_network(&network),
            );
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("login_failed")
                    .with_command("login")
                    .with_network(&network)
                    .with_error(e.display_message()),
            );
            return Err(e.into());
        }
    }

    if let Some(account) = board.session() {
        println!(
            "{} Logged in as {} on {}",
            "✓".green(),
            account.username().bold(),
            network
        );
    }

    match board.error() {
        Some(error) => println!("{} {}", "Could not load notes:".yellow(), error),
        None => println!("  {} note(s)", board.feed().len()),
    }

    Ok(())
}
