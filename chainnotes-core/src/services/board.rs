//! Note board - the session state a front end owns
//!
//! Holds the bound account, the last fetched notes, the status line and the
//! error line. Every operation replaces these wholesale. Failures are
//! returned to the caller and also kept as a bounded display message, so a
//! front end can either render `error()` or handle the `Result`.

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountInfo, Credentials, NoteFeed, NoteReceipt, WriteEvent, WriteState};
use crate::ports::{Connector, CredentialStore};

use super::notes::{validate_note_text, NoteService};
use super::session::SessionService;

pub struct NoteBoard {
    store: Arc<dyn CredentialStore>,
    sessions: SessionService,
    notes: NoteService,
    session: Option<AccountInfo>,
    feed: NoteFeed,
    error: Option<String>,
    status: Option<String>,
    refreshing: bool,
    write: WriteState,
}

impl NoteBoard {
    pub fn new(store: Arc<dyn CredentialStore>, connector: Arc<dyn Connector>) -> Self {
        Self {
            store,
            sessions: SessionService::new(connector),
            notes: NoteService::new(),
            session: None,
            feed: NoteFeed::default(),
            error: None,
            status: None,
            refreshing: false,
            write: WriteState::Idle,
        }
    }

    // === State ===

    pub fn session(&self) -> Option<&AccountInfo> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn feed(&self) -> &NoteFeed {
        &self.feed
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn write_state(&self) -> &WriteState {
        &self.write
    }

    pub fn network(&self) -> &str {
        self.sessions.network()
    }

    // === Operations ===

    /// Log in with stored credentials
    ///
    /// Returns `Ok(false)` when nothing is stored; that is the logged-out
    /// state, not an error.
    pub async fn restore(&mut self) -> Result<bool> {
        let credentials = match self.store.load() {
            Ok(credentials) => credentials,
            Err(Error::StorageEmpty) => return Ok(false),
            Err(e) => return Err(self.record(e)),
        };
        self.login(credentials).await?;
        Ok(true)
    }

    /// Bind `credentials`, persist them and fetch the notes
    ///
    /// A failed fetch after a successful bind leaves the session in place
    /// and shows up in `error()`.
    pub async fn login(&mut self, credentials: Credentials) -> Result<()> {
        self.error = None;
        if !credentials.is_complete() {
            return Err(self.record(Error::MissingCredentials(
                "both privateKey and username are required".to_string(),
            )));
        }

        let account = match self.sessions.bind_credentials(&credentials).await {
            Ok(account) => account,
            Err(e) => return Err(self.record(e)),
        };
        self.session = Some(account);

        if let Err(e) = self.store.save(&credentials.private_key, &credentials.username) {
            return Err(self.record(e));
        }

        // A failed fetch is already in `error()`
        self.refresh().await.ok();
        Ok(())
    }

    /// Re-read the note list of the bound account
    pub async fn refresh(&mut self) -> Result<()> {
        let Some(account) = self.session.clone() else {
            return Err(self.record(Error::NoSession));
        };

        self.refreshing = true;
        let result = self
            .notes
            .list_notes(account.username_hash(), account.signer())
            .await;
        self.refreshing = false;

        match result {
            Ok(notes) => {
                self.feed = NoteFeed::new(notes);
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Submit a note, then refresh once it is confirmed
    pub async fn submit(&mut self, text: &str) -> Result<NoteReceipt> {
        self.submit_with(text, |_| {}).await
    }

    /// [`NoteBoard::submit`] with a callback for every write state
    pub async fn submit_with<F>(&mut self, text: &str, mut observe: F) -> Result<NoteReceipt>
    where
        F: FnMut(&WriteState) + Send,
    {
        self.error = None;
        let Some(account) = self.session.clone() else {
            return Err(self.record(Error::NoSession));
        };
        if let Err(e) = validate_note_text(text) {
            return Err(self.record(e));
        }

        let notes = self.notes;
        let status = &mut self.status;
        let write = &mut self.write;
        let result = notes
            .submit(text, account.signer(), |state| {
                if let Some(line) = state.status_text() {
                    *status = Some(line);
                }
                *write = state.clone();
                observe(state);
            })
            .await;

        if self.write.is_terminal() {
            self.write = self.write.apply(WriteEvent::Reset)?;
        }

        match result {
            Ok(receipt) => {
                self.refresh().await.ok();
                Ok(receipt)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Forget the session and clear the stored credentials
    pub fn logout(&mut self) -> Result<()> {
        self.store.save("", "")?;
        self.session = None;
        self.feed = NoteFeed::default();
        self.status = None;
        self.error = None;
        self.write = WriteState::Idle;
        Ok(())
    }

    fn record(&mut self, err: Error) -> Error {
        self.error = Some(err.display_message());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryChain, MemoryCredentialStore, MemorySigner};
    use crate::domain::UsernameHash;
    use crate::ports::ChainSigner;
    use ethers::types::Address;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    struct Fixture {
        chain: MemoryChain,
        store: Arc<MemoryCredentialStore>,
        board: NoteBoard,
        hash: UsernameHash,
    }

    fn fixture(store: MemoryCredentialStore) -> Fixture {
        let chain = MemoryChain::new();
        let address = MemorySigner::new(chain.clone(), KEY).unwrap().address();
        let hash = chain.register(address, "alice");
        let store = Arc::new(store);
        let board = NoteBoard::new(store.clone(), Arc::new(chain.connector()));
        Fixture {
            chain,
            store,
            board,
            hash,
        }
    }

    #[tokio::test]
    async fn test_restore_with_empty_store_is_logged_out_without_error() {
        let mut f = fixture(MemoryCredentialStore::new());
        assert!(!f.board.restore().await.unwrap());
        assert!(!f.board.is_logged_in());
        assert!(f.board.error().is_none());
    }

    #[tokio::test]
    async fn test_restore_logs_in_and_fetches() {
        let mut f = fixture(MemoryCredentialStore::with_credentials(KEY, "alice"));
        f.chain.seed_note(f.hash, Address::zero(), "first");

        assert!(f.board.restore().await.unwrap());
        assert!(f.board.is_logged_in());
        assert_eq!(f.board.feed().len(), 1);
    }

    #[tokio::test]
    async fn test_restore_with_wrong_username_fails_distinctly() {
        let mut f = fixture(MemoryCredentialStore::with_credentials(KEY, "mallory"));
        let err = f.board.restore().await.unwrap_err();
        assert!(matches!(err, Error::UsernameMismatch));
        assert!(!f.board.is_logged_in());
        assert!(f.board.error().unwrap().contains("does not match"));
    }

    #[tokio::test]
    async fn test_login_persists_credentials() {
        let mut f = fixture(MemoryCredentialStore::new());
        f.board
            .login(Credentials::new(KEY, "alice"))
            .await
            .unwrap();
        assert_eq!(f.store.load().unwrap(), Credentials::new(KEY, "alice"));
    }

    #[tokio::test]
    async fn test_failed_fetch_after_login_keeps_session() {
        let mut f = fixture(MemoryCredentialStore::new());
        f.chain.fail_next_notes_read("502 Bad Gateway");

        f.board
            .login(Credentials::new(KEY, "alice"))
            .await
            .unwrap();

        assert!(f.board.is_logged_in());
        assert_eq!(f.board.error(), Some("502 Bad Gateway"));
        assert!(f.board.feed().is_empty());
        assert!(!f.board.is_refreshing());
        assert_eq!(f.store.load().unwrap(), Credentials::new(KEY, "alice"));

        f.board.refresh().await.unwrap();
        assert!(f.board.is_logged_in());
    }

    #[tokio::test]
    async fn test_failed_login_does_not_persist() {
        let mut f = fixture(MemoryCredentialStore::new());
        f.board
            .login(Credentials::new(KEY, "bob"))
            .await
            .unwrap_err();
        assert!(matches!(f.store.load(), Err(Error::StorageEmpty)));
    }

    #[tokio::test]
    async fn test_refresh_without_session() {
        let mut f = fixture(MemoryCredentialStore::new());
        let err = f.board.refresh().await.unwrap_err();
        assert!(matches!(err, Error::NoSession));
        assert_eq!(
            f.board.error(),
            Some("Application session is not created for notes retrieving")
        );
    }

    #[tokio::test]
    async fn test_submit_then_feed_is_newest_first() {
        let mut f = fixture(MemoryCredentialStore::with_credentials(KEY, "alice"));
        f.board.restore().await.unwrap();

        for text in ["a", "b", "c"] {
            f.board.submit(text).await.unwrap();
        }

        let shown: Vec<_> = f.board.feed().display().iter().map(|n| n.text.clone()).collect();
        assert_eq!(shown, vec!["c", "b", "a"]);
        assert_eq!(f.board.status(), Some("Sent!"));
        assert_eq!(f.board.write_state(), &WriteState::Idle);
    }

    #[tokio::test]
    async fn test_blank_submit_is_rejected_locally() {
        let mut f = fixture(MemoryCredentialStore::with_credentials(KEY, "alice"));
        f.board.restore().await.unwrap();

        let err = f.board.submit("   ").await.unwrap_err();
        assert!(matches!(err, Error::ValidationEmpty));
        assert!(f.chain.write_calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_failure_is_shown() {
        let mut f = fixture(MemoryCredentialStore::with_credentials(KEY, "alice"));
        f.board.restore().await.unwrap();
        f.chain.fail_next_confirmation("replacement transaction underpriced");

        f.board.submit("hello").await.unwrap_err();
        assert_eq!(f.board.error(), Some("replacement transaction underpriced"));
        assert_eq!(f.board.status(), Some("Waiting 1 confirmation..."));
        assert_eq!(f.board.write_state(), &WriteState::Idle);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let mut f = fixture(MemoryCredentialStore::with_credentials(KEY, "alice"));
        f.board.restore().await.unwrap();
        f.board.logout().unwrap();

        assert!(!f.board.is_logged_in());
        assert!(f.board.feed().is_empty());
        assert!(matches!(f.store.load(), Err(Error::StorageEmpty)));
    }
}
