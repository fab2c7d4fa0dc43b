/// On-chain agent registry collaborator.
///
/// The registry program itself is an external service; this module only
/// models the instructions the SDK invokes and the record it reads back.
/// Fee accounting and transaction signing live behind the trait. Every
/// update bumps the on-chain version counter, which combined with
/// immutable secure blocks yields an auditable configuration history.
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One NFT-bound agent record as read from the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Base58 public key of the agent's NFT asset (mint).
    pub asset_id: String,
    /// Base58 public key of the current owner wallet.
    pub owner: String,
    /// URI of the stored secure block holding the configuration.
    pub metadata_uri: String,
    /// On-chain version counter, bumped on every configuration update.
    pub version: u64,
    /// Paused agents keep their record but are inactive.
    pub paused: bool,
}

/// Receipt returned after a confirmed registry transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction signature on the chain.
    pub signature: String,
    /// Slot the transaction landed in (None if unconfirmed).
    pub slot: Option<u64>,
}

/// Trait for the on-chain registry program.
///
/// Implementations handle RPC transport, fees and confirmation; the SDK
/// treats them as opaque. A mock implementation backs the test harness —
/// the choice between real and mock is made by injection, never by an
/// environment check inside the core.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Human-readable name of the backing cluster or implementation.
    fn name(&self) -> &str;

    /// Create a new agent record bound to `asset_id`.
    async fn create_record(
        &self,
        asset_id: &str,
        owner: &str,
        metadata_uri: &str,
    ) -> Result<TxReceipt>;

    /// Point the record at a new secure block and bump its version.
    async fn update_record(&self, asset_id: &str, metadata_uri: &str) -> Result<TxReceipt>;

    /// Transfer ownership of the record to another wallet.
    async fn transfer_record(&self, asset_id: &str, new_owner: &str) -> Result<TxReceipt>;

    /// Pause or resume the agent.
    async fn set_paused(&self, asset_id: &str, paused: bool) -> Result<TxReceipt>;

    /// Close the record and reclaim its rent.
    async fn close_record(&self, asset_id: &str) -> Result<TxReceipt>;

    /// Read the current record state.
    async fn fetch_record(&self, asset_id: &str) -> Result<AgentRecord>;
}
