/// In-memory registry double for tests and offline development.
///
/// Mirrors the program's account rules closely enough for the SDK's own
/// tests: one record per asset, version bumps on update, ownership
/// checks on transfer.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AgentRecord, RegistryClient, TxReceipt};
use crate::error::{RegistryError, Result};

#[derive(Default)]
pub struct MockRegistry {
    records: RwLock<HashMap<String, AgentRecord>>,
    slot: RwLock<u64>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn receipt(&self, asset_id: &str, op: &str) -> TxReceipt {
        let mut slot = self.slot.write().await;
        *slot += 1;
        let digest = blake3::hash(format!("{}:{}:{}", op, asset_id, *slot).as_bytes());
        TxReceipt {
            signature: bs58::encode(&digest.as_bytes()[..32]).into_string(),
            slot: Some(*slot),
        }
    }
}

#[async_trait]
impl RegistryClient for MockRegistry {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_record(
        &self,
        asset_id: &str,
        owner: &str,
        metadata_uri: &str,
    ) -> Result<TxReceipt> {
        let mut records = self.records.write().await;
        if records.contains_key(asset_id) {
            return Err(RegistryError::Chain(format!(
                "record already exists: {asset_id}"
            )));
        }
        records.insert(
            asset_id.to_string(),
            AgentRecord {
                asset_id: asset_id.to_string(),
                owner: owner.to_string(),
                metadata_uri: metadata_uri.to_string(),
                version: 1,
                paused: false,
            },
        );
        drop(records);
        Ok(self.receipt(asset_id, "create").await)
    }

    async fn update_record(&self, asset_id: &str, metadata_uri: &str) -> Result<TxReceipt> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::Chain(format!("record not found: {asset_id}")))?;
        record.metadata_uri = metadata_uri.to_string();
        record.version += 1;
        drop(records);
        Ok(self.receipt(asset_id, "update").await)
    }

    async fn transfer_record(&self, asset_id: &str, new_owner: &str) -> Result<TxReceipt> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::Chain(format!("record not found: {asset_id}")))?;
        record.owner = new_owner.to_string();
        drop(records);
        Ok(self.receipt(asset_id, "transfer").await)
    }

    async fn set_paused(&self, asset_id: &str, paused: bool) -> Result<TxReceipt> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::Chain(format!("record not found: {asset_id}")))?;
        record.paused = paused;
        drop(records);
        Ok(self.receipt(asset_id, "set_paused").await)
    }

    async fn close_record(&self, asset_id: &str) -> Result<TxReceipt> {
        let mut records = self.records.write().await;
        records
            .remove(asset_id)
            .ok_or_else(|| RegistryError::Chain(format!("record not found: {asset_id}")))?;
        drop(records);
        Ok(self.receipt(asset_id, "close").await)
    }

    async fn fetch_record(&self, asset_id: &str) -> Result<AgentRecord> {
        let records = self.records.read().await;
        records
            .get(asset_id)
            .cloned()
            .ok_or_else(|| RegistryError::Chain(format!("record not found: {asset_id}")))
    }
}
