//! JSON-RPC adapter for the GetLogin identity contract and the notes contract

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::{abigen, ContractError};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash, U256};

use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::{NoteReceipt, NoteRecord, UsernameHash};
use crate::ports::{ChainSigner, Connector, IdentityRegistry, NotesRegistry, UsernameRecord};

abigen!(
    GetLoginStorage,
    r"[
        function UsersAddressUsername(address) external view returns (bool, bytes32)
    ]"
);

abigen!(
    NotesBook,
    r"[
        struct OnChainNote { address author; uint256 timestamp; string text; }

        function getNotes(bytes32 usernameHash) external view returns (OnChainNote[] memory)

        function createNote(string text) external
    ]"
);

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Connects wallets to a single configured RPC endpoint
#[derive(Debug, Clone)]
pub struct RpcConnector {
    rpc_url: String,
    identity_address: Address,
    notes_address: Address,
}

impl RpcConnector {
    pub fn new(rpc_url: impl Into<String>, identity_address: Address, notes_address: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            identity_address,
            notes_address,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.rpc_url.clone(),
            config.identity_contract()?,
            config.notes_contract()?,
        ))
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl Connector for RpcConnector {
    fn network(&self) -> &str {
        "gnosis"
    }

    async fn connect(&self, private_key: &str) -> Result<Arc<dyn ChainSigner>> {
        let provider = Provider::<Http>::try_from(self.rpc_url.as_str())
            .map_err(|e| Error::transport(format!("Invalid RPC URL {}: {}", self.rpc_url, e)))?;
        let wallet = LocalWallet::from_str(private_key.trim())
            .map_err(|e| Error::transport(format!("Invalid private key: {}", e)))?;
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(Error::transport)?
            .as_u64();

        let client = Arc::new(SignerMiddleware::new(provider, wallet.with_chain_id(chain_id)));

        Ok(Arc::new(RpcSigner {
            identity: GetLoginStorage::new(self.identity_address, client.clone()),
            notes: NotesBook::new(self.notes_address, client.clone()),
            client,
        }))
    }
}

/// Wallet connected over HTTP, with both contract bindings
pub struct RpcSigner {
    client: Arc<Client>,
    identity: GetLoginStorage<Client>,
    notes: NotesBook<Client>,
}

impl ChainSigner for RpcSigner {
    fn address(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl IdentityRegistry for RpcSigner {
    async fn username_record(&self, address: Address) -> Result<Option<UsernameRecord>> {
        username_record_from_call(self.identity.users_address_username(address).call().await)
    }
}

/// `getNotes` tuples `(author, timestamp, text)` in chain order
fn note_records(tuples: Vec<(Address, U256, String)>) -> Vec<NoteRecord> {
    tuples
        .into_iter()
        .map(|(author, timestamp, text)| NoteRecord {
            author,
            timestamp: timestamp.low_u64(),
            text,
        })
        .collect()
}

/// Map the `UsersAddressUsername` call result
///
/// An empty return (no contract code, or nothing to decode) means the
/// address has no record; anything else that fails is a transport error.
fn username_record_from_call<M: Middleware>(
    result: std::result::Result<(bool, [u8; 32]), ContractError<M>>,
) -> Result<Option<UsernameRecord>> {
    match result {
        Ok((active, hash)) => Ok(Some(UsernameRecord {
            active,
            username_hash: UsernameHash::from_bytes(hash),
        })),
        Err(
            ContractError::ContractNotDeployed
            | ContractError::DecodingError(_)
            | ContractError::AbiError(_)
            | ContractError::DetokenizationError(_),
        ) => Ok(None),
        Err(e) => Err(Error::transport(e)),
    }
}

#[async_trait]
impl NotesRegistry for RpcSigner {
    async fn get_notes(&self, username_hash: UsernameHash) -> Result<Vec<NoteRecord>> {
        let records = self
            .notes
            .get_notes(username_hash.to_bytes())
            .call()
            .await
            .map_err(Error::transport)?;

        Ok(note_records(records))
    }

    async fn create_note(&self, text: &str) -> Result<TxHash> {
        let call = self.notes.create_note(text.to_string());
        let pending = call.send().await.map_err(Error::transport)?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: usize,
    ) -> Result<NoteReceipt> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .confirmations(confirmations)
            .await
            .map_err(Error::transport)?
            .ok_or_else(|| {
                Error::transport(format!(
                    "Transaction {:?} was dropped before confirmation",
                    tx_hash
                ))
            })?;

        Ok(NoteReceipt {
            tx_hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_identity_address() {
        let config = Config::default();
        assert!(matches!(
            RpcConnector::from_config(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            identity_address: Some("0x00000000000000000000000000000000000000aa".to_string()),
            ..Config::default()
        };
        let connector = RpcConnector::from_config(&config).unwrap();
        assert_eq!(connector.rpc_url(), crate::config::DEFAULT_RPC_URL);
        assert_eq!(connector.network(), "gnosis");
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_key() {
        let connector = RpcConnector::new(
            "http://127.0.0.1:1",
            Address::repeat_byte(1),
            Address::repeat_byte(2),
        );
        let err = connector.connect("not-a-key").await.err().unwrap();
        assert!(matches!(err, Error::Transport(msg) if msg.starts_with("Invalid private key")));
    }

    #[test]
    fn test_note_records_take_text_from_third_field() {
        let author = Address::repeat_byte(7);
        let records = note_records(vec![
            (author, U256::from(1_700_000_000u64), "first".to_string()),
            (author, U256::from(1_700_000_060u64), "second".to_string()),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, author);
        assert_eq!(records[0].timestamp, 1_700_000_000);
        assert_eq!(records[0].text, "first");
        assert_eq!(records[1].text, "second");
    }

    #[test]
    fn test_username_record_decoded() {
        let hash = UsernameHash::of("alice");
        let record = username_record_from_call::<Client>(Ok((true, hash.to_bytes())))
            .unwrap()
            .unwrap();
        assert!(record.active);
        assert_eq!(record.username_hash, hash);
    }

    #[test]
    fn test_empty_username_record_is_absent() {
        assert!(username_record_from_call::<Client>(Err(ContractError::ContractNotDeployed))
            .unwrap()
            .is_none());
        assert!(username_record_from_call::<Client>(Err(ContractError::DecodingError(
            ethers::abi::Error::InvalidData
        )))
        .unwrap()
        .is_none());
    }

    #[test]
    fn test_username_record_provider_failure_is_transport() {
        let err = username_record_from_call::<Client>(Err(ContractError::ProviderError {
            e: ethers::providers::ProviderError::CustomError("connection refused".to_string()),
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Transport(msg) if msg.contains("connection refused")));
    }
}
