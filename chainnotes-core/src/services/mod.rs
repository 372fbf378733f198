//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. `NoteBoard` is
//! the one a front end holds; the rest are its building blocks plus the
//! demo and event-log housekeeping.

mod board;
mod demo;
pub mod links;
pub mod logging;
mod notes;
mod session;

pub use board::NoteBoard;
pub use demo::DemoService;
pub use links::{authorize_url, install_url, parse_callback, Platform};
pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LogFilter, LoggingService};
pub use notes::{validate_note_text, NoteService, PendingNote};
pub use session::SessionService;
