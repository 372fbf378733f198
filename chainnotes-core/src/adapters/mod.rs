//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - ethers JSON-RPC client for the identity and notes contracts
//! - JSON file for the CredentialStore port
//! - In-memory store and chain for tests
//! - File-backed in-memory chain for demo mode

pub mod demo;
pub mod file_store;
pub mod memory;
pub mod rpc;
