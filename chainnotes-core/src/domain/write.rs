//! Write-path state machine
//!
//! ```text
//! Idle -> Submitting -> AwaitingConfirmation -> Confirmed -> Idle
//!             |                  |
//!             +----> Failed <----+ -> Idle
//! ```
//!
//! The machine belongs to the caller. The note service only reports which
//! event happened; [`WriteState::apply`] rejects anything off the graph.

use std::fmt;

use ethers::types::TxHash;
use serde::Serialize;

use super::result::{Error, Result};

/// Confirmations a note transaction needs before it counts as durable
pub const REQUIRED_CONFIRMATIONS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WriteState {
    Idle,
    Submitting,
    AwaitingConfirmation { tx_hash: TxHash },
    Confirmed { tx_hash: TxHash },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteEvent {
    Submit,
    Submitted(TxHash),
    Confirmed(TxHash),
    Failed(String),
    Reset,
}

impl WriteState {
    /// Move to the next state, or fail with `InvalidTransition`
    pub fn apply(&self, event: WriteEvent) -> Result<WriteState> {
        use WriteState::*;

        match (self, event) {
            (Idle, WriteEvent::Submit) => Ok(Submitting),
            (Submitting, WriteEvent::Submitted(tx_hash)) => Ok(AwaitingConfirmation { tx_hash }),
            (AwaitingConfirmation { .. }, WriteEvent::Confirmed(tx_hash)) => {
                Ok(Confirmed { tx_hash })
            }
            (Submitting | AwaitingConfirmation { .. }, WriteEvent::Failed(message)) => {
                Ok(Failed { message })
            }
            (Confirmed { .. } | Failed { .. }, WriteEvent::Reset) => Ok(Idle),
            (state, event) => Err(Error::InvalidTransition(format!(
                "{:?} while {}",
                event, state
            ))),
        }
    }

    /// Status line shown while a note is in flight
    pub fn status_text(&self) -> Option<String> {
        match self {
            WriteState::Submitting => Some("Sending transaction...".to_string()),
            WriteState::AwaitingConfirmation { .. } => Some(format!(
                "Waiting {} confirmation...",
                REQUIRED_CONFIRMATIONS
            )),
            WriteState::Confirmed { .. } => Some("Sent!".to_string()),
            WriteState::Idle | WriteState::Failed { .. } => None,
        }
    }

    /// True while a submission is in progress
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WriteState::Submitting | WriteState::AwaitingConfirmation { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WriteState::Confirmed { .. } | WriteState::Failed { .. })
    }
}

impl Default for WriteState {
    fn default() -> Self {
        WriteState::Idle
    }
}

impl fmt::Display for WriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteState::Idle => "idle",
            WriteState::Submitting => "submitting",
            WriteState::AwaitingConfirmation { .. } => "awaiting_confirmation",
            WriteState::Confirmed { .. } => "confirmed",
            WriteState::Failed { .. } => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> TxHash {
        TxHash::repeat_byte(0xab)
    }

    #[test]
    fn test_happy_path() {
        let state = WriteState::Idle;
        let state = state.apply(WriteEvent::Submit).unwrap();
        assert_eq!(state, WriteState::Submitting);
        assert_eq!(state.status_text().as_deref(), Some("Sending transaction..."));

        let state = state.apply(WriteEvent::Submitted(hash())).unwrap();
        assert_eq!(state.status_text().as_deref(), Some("Waiting 1 confirmation..."));
        assert!(state.is_busy());

        let state = state.apply(WriteEvent::Confirmed(hash())).unwrap();
        assert_eq!(state.status_text().as_deref(), Some("Sent!"));
        assert!(state.is_terminal());

        let state = state.apply(WriteEvent::Reset).unwrap();
        assert_eq!(state, WriteState::Idle);
    }

    #[test]
    fn test_fail_while_submitting() {
        let state = WriteState::Submitting
            .apply(WriteEvent::Failed("insufficient funds".to_string()))
            .unwrap();
        assert_eq!(
            state,
            WriteState::Failed {
                message: "insufficient funds".to_string()
            }
        );
        assert_eq!(state.apply(WriteEvent::Reset).unwrap(), WriteState::Idle);
    }

    #[test]
    fn test_fail_while_awaiting_confirmation() {
        let state = WriteState::AwaitingConfirmation { tx_hash: hash() }
            .apply(WriteEvent::Failed("dropped".to_string()))
            .unwrap();
        assert!(matches!(state, WriteState::Failed { .. }));
        assert!(state.status_text().is_none());
    }

    #[test]
    fn test_rejects_off_graph_transitions() {
        assert!(matches!(
            WriteState::Idle.apply(WriteEvent::Confirmed(hash())),
            Err(Error::InvalidTransition(_))
        ));
        assert!(WriteState::Idle
            .apply(WriteEvent::Failed("x".to_string()))
            .is_err());
        assert!(WriteState::Submitting.apply(WriteEvent::Submit).is_err());
        assert!(WriteState::Submitting.apply(WriteEvent::Reset).is_err());
        assert!(WriteState::Confirmed { tx_hash: hash() }
            .apply(WriteEvent::Submit)
            .is_err());
    }
}
