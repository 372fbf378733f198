//! Notes command - list the notes of the logged-in user

use anyhow::Result;
use chainnotes_core::services::LogEvent;
use colored::Colorize;

use super::{get_context, get_logger, log_event, logged_in_board};
use crate::output::create_table;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let mut board = logged_in_board(&ctx).await?;

    // restore() records a failed fetch instead of returning it
    if let Some(error) = board.error() {
        anyhow::bail!("{}", error);
    }
    log_event(
        &get_logger(),
        LogEvent::new("notes_listed")
            .with_command("notes")
            .with_network(board.network()),
    );

    let notes = board.feed().display();

    if json {
        let texts: Vec<&str> = notes.iter().map(|n| n.text.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&texts)?);
        return Ok(());
    }

    if notes.is_empty() {
        println!("{}", "Notes not found".yellow());
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["#", "Note"]);
    let total = notes.len();
    for (i, note) in notes.iter().enumerate() {
        table.add_row(vec![(total - i).to_string(), note.text.clone()]);
    }
    println!("{}", table);
    println!("{}", format!("{} note(s), newest first", total).dimmed());

    Ok(())
}
