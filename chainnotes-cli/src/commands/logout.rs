//! Logout command - forget the stored session

use anyhow::Result;
use chainnotes_core::ports::CredentialStore;
use chainnotes_core::services::LogEvent;
use colored::Colorize;
use dialoguer::Confirm;

use super::{get_context, get_logger, log_event};

pub fn run(force: bool) -> Result<()> {
    let ctx = get_context()?;

    if !force
        && !Confirm::new()
            .with_prompt("Really logout?")
            .default(false)
            .interact()?
    {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    // No board: logout works without a configured network
    ctx.store.save("", "")?;
    log_event(&get_logger(), LogEvent::new("logout").with_command("logout"));

    println!("{} Logged out", "✓".green());
    Ok(())
}
