//! Note service - read and write notes for a bound session

use ethers::types::TxHash;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Note, NoteReceipt, UsernameHash, WriteEvent, WriteState, REQUIRED_CONFIRMATIONS,
};
use crate::ports::ChainSigner;

/// A submitted note that is not durable until [`PendingNote::wait`] returns
pub struct PendingNote<'a> {
    signer: &'a dyn ChainSigner,
    tx_hash: TxHash,
}

impl<'a> PendingNote<'a> {
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for `confirmations` confirmations of the note transaction
    pub async fn wait(self, confirmations: usize) -> Result<NoteReceipt> {
        self.signer
            .wait_for_confirmations(self.tx_hash, confirmations)
            .await
    }
}

/// Trim note text, rejecting blank input before anything reaches the chain
pub fn validate_note_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::ValidationEmpty);
    }
    Ok(trimmed)
}

/// Note exchange client
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteService;

impl NoteService {
    pub fn new() -> Self {
        Self
    }

    /// All notes for `username_hash`, in chain order
    pub async fn list_notes(
        &self,
        username_hash: UsernameHash,
        signer: &dyn ChainSigner,
    ) -> Result<Vec<Note>> {
        let records = signer.get_notes(username_hash).await?;
        Ok(records.into_iter().map(Note::from).collect())
    }

    /// Send `createNote(text)` exactly as given
    pub async fn create_note<'a>(
        &self,
        text: &str,
        signer: &'a dyn ChainSigner,
    ) -> Result<PendingNote<'a>> {
        let tx_hash = signer.create_note(text).await?;
        Ok(PendingNote { signer, tx_hash })
    }

    /// Validate, submit and confirm a note, reporting each write state
    ///
    /// The observer sees `Submitting`, then `AwaitingConfirmation`, then
    /// `Confirmed` or `Failed`. Blank text fails with `ValidationEmpty`
    /// before any state is reported.
    pub async fn submit<F>(
        &self,
        text: &str,
        signer: &dyn ChainSigner,
        mut observe: F,
    ) -> Result<NoteReceipt>
    where
        F: FnMut(&WriteState) + Send,
    {
        let text = validate_note_text(text)?;

        let state = WriteState::Idle.apply(WriteEvent::Submit)?;
        observe(&state);

        let pending = match self.create_note(text, signer).await {
            Ok(pending) => pending,
            Err(e) => {
                observe(&state.apply(WriteEvent::Failed(e.display_message()))?);
                return Err(e);
            }
        };

        let state = state.apply(WriteEvent::Submitted(pending.tx_hash()))?;
        observe(&state);

        match pending.wait(REQUIRED_CONFIRMATIONS).await {
            Ok(receipt) => {
                observe(&state.apply(WriteEvent::Confirmed(receipt.tx_hash))?);
                Ok(receipt)
            }
            Err(e) => {
                observe(&state.apply(WriteEvent::Failed(e.display_message()))?);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryChain, MemorySigner};

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn registered() -> (MemoryChain, MemorySigner, UsernameHash) {
        let chain = MemoryChain::new();
        let signer = MemorySigner::new(chain.clone(), KEY).unwrap();
        let hash = chain.register(signer.address(), "alice");
        (chain, signer, hash)
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (_chain, signer, hash) = registered();
        let notes = NoteService::new().list_notes(hash, &signer).await.unwrap();
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_chain_order() {
        let (chain, signer, hash) = registered();
        for text in ["a", "b", "c"] {
            chain.seed_note(hash, signer.address(), text);
        }
        let notes = NoteService::new().list_notes(hash, &signer).await.unwrap();
        let texts: Vec<_> = notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_list_surfaces_transport_error() {
        let (chain, signer, hash) = registered();
        chain.fail_reads(Some("503 Service Unavailable"));
        let err = NoteService::new().list_notes(hash, &signer).await.unwrap_err();
        assert!(matches!(err, Error::Transport(msg) if msg == "503 Service Unavailable"));
    }

    #[tokio::test]
    async fn test_create_note_is_two_phase() {
        let (chain, signer, hash) = registered();
        let service = NoteService::new();

        let pending = service.create_note("hello", &signer).await.unwrap();
        assert_eq!(chain.write_calls(), vec!["hello".to_string()]);
        assert!(service.list_notes(hash, &signer).await.unwrap().is_empty());

        pending.wait(1).await.unwrap();
        assert_eq!(service.list_notes(hash, &signer).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_reports_states() {
        let (chain, signer, _) = registered();
        let mut seen = Vec::new();

        NoteService::new()
            .submit("hello", &signer, |state| seen.push(state.to_string()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["submitting", "awaiting_confirmation", "confirmed"]);
        assert_eq!(chain.write_calls(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_trims_text() {
        let (chain, signer, _) = registered();
        NoteService::new()
            .submit("  hello \n", &signer, |_| {})
            .await
            .unwrap();
        assert_eq!(chain.write_calls(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_text_never_reaches_chain() {
        let (chain, signer, _) = registered();
        let mut seen = 0;

        let err = NoteService::new()
            .submit("   ", &signer, |_| seen += 1)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ValidationEmpty));
        assert_eq!(seen, 0);
        assert!(chain.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_failure_while_submitting() {
        let (chain, signer, _) = registered();
        chain.fail_next_submit("insufficient funds for gas");
        let mut states = Vec::new();

        let err = NoteService::new()
            .submit("hello", &signer, |state| states.push(state.clone()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "insufficient funds for gas");
        assert_eq!(states.len(), 2);
        assert_eq!(
            states[1],
            WriteState::Failed {
                message: "insufficient funds for gas".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_submit_failure_while_confirming() {
        let (chain, signer, hash) = registered();
        chain.fail_next_confirmation("timeout waiting for receipt");
        let mut states = Vec::new();

        NoteService::new()
            .submit("hello", &signer, |state| states.push(state.to_string()))
            .await
            .unwrap_err();

        assert_eq!(states, vec!["submitting", "awaiting_confirmation", "failed"]);
        assert_eq!(chain.write_calls().len(), 1);
        assert!(NoteService::new()
            .list_notes(hash, &signer)
            .await
            .unwrap()
            .is_empty());
    }
}
