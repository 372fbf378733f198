//! CLI command implementations

pub mod authorize;
pub mod demo;
pub mod login;
pub mod logout;
pub mod logs;
pub mod notes;
pub mod post;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chainnotes_core::services::{EntryPoint, LogEvent, LoggingService, NoteBoard};
use chainnotes_core::NotesContext;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let app_dir = get_app_dir().ok()?;
    LoggingService::new(&app_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// App directory from `CHAINNOTES_DIR`, or `~/.chainnotes`
pub fn get_app_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CHAINNOTES_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".chainnotes"))
        .ok_or_else(|| anyhow!("Could not find home directory; set CHAINNOTES_DIR"))
}

pub fn get_context() -> Result<NotesContext> {
    let app_dir = get_app_dir()?;
    NotesContext::new(&app_dir)
        .with_context(|| format!("Failed to initialize app directory: {:?}", app_dir))
}

/// Board restored from the stored credentials
///
/// Fails with a hint when nobody is logged in.
pub async fn logged_in_board(ctx: &NotesContext) -> Result<NoteBoard> {
    let mut board = ctx.board()?;
    if !board.restore().await? {
        anyhow::bail!("Not logged in. Run 'cnotes login' or 'cnotes demo on'.");
    }
    Ok(board)
}
