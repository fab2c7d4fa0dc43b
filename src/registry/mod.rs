/// High-level agent operations: the SDK surface callers use.
///
/// Wires the envelope encryption core to the injected on-chain registry
/// and storage collaborators. All encryption happens client-side; the
/// collaborators only ever see opaque secure blocks and URIs.
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::chain::{AgentRecord, RegistryClient, TxReceipt};
use crate::crypto::access;
use crate::crypto::block::SecureBlock;
use crate::crypto::keys::{self, EncryptionPublicKey, SigningKeyPair};
use crate::error::{RegistryError, Result};
use crate::storage::StorageBackend;

/// Client facade over one registry and one storage backend.
///
/// Collaborators are injected by reference; the facade holds no hidden
/// global state and each call stands alone.
pub struct AgentClient {
    chain: Arc<dyn RegistryClient>,
    storage: Arc<dyn StorageBackend>,
}

impl AgentClient {
    pub fn new(chain: Arc<dyn RegistryClient>, storage: Arc<dyn StorageBackend>) -> Self {
        Self { chain, storage }
    }

    /// Create an agent: encrypt the configuration, upload the secure
    /// block and register the on-chain record.
    ///
    /// The owner is always a recipient; `extra_recipients` are base58
    /// public keys of additional wallets (e.g., a protocol service key).
    pub async fn create_agent(
        &self,
        asset_id: &str,
        config: &Value,
        owner: &SigningKeyPair,
        extra_recipients: &[String],
    ) -> Result<TxReceipt> {
        let uri = self
            .encrypt_and_store(asset_id, config, owner, extra_recipients)
            .await?;

        let receipt = self
            .chain
            .create_record(asset_id, &owner.identity(), &uri)
            .await?;

        info!(
            asset_id = %asset_id,
            uri = %uri,
            recipients = extra_recipients.len() + 1,
            "Agent created"
        );
        Ok(receipt)
    }

    /// Fetch and decrypt the agent's configuration for one wallet.
    pub async fn get_agent_config(
        &self,
        asset_id: &str,
        signing: &SigningKeyPair,
    ) -> Result<Value> {
        let record = self.chain.fetch_record(asset_id).await?;
        let bytes = self.storage.fetch(&record.metadata_uri).await?;

        let block = SecureBlock::from_bytes(&bytes)?;
        let plaintext = access::open(&block, asset_id, signing)?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| RegistryError::Serialization(format!("configuration payload: {e}")))
    }

    /// Replace the agent's configuration.
    ///
    /// Builds a completely new secure block (fresh content key, nonce
    /// and keyring) and bumps the on-chain version counter; the previous
    /// block is never mutated. This is also the re-encryption path for
    /// changing the recipient set, e.g. after a transfer.
    pub async fn update_agent_config(
        &self,
        asset_id: &str,
        config: &Value,
        owner: &SigningKeyPair,
        extra_recipients: &[String],
    ) -> Result<TxReceipt> {
        let uri = self
            .encrypt_and_store(asset_id, config, owner, extra_recipients)
            .await?;

        let receipt = self.chain.update_record(asset_id, &uri).await?;

        info!(asset_id = %asset_id, uri = %uri, "Agent configuration updated");
        Ok(receipt)
    }

    /// Transfer the on-chain record to another wallet.
    ///
    /// The new owner cannot read the current configuration until an
    /// update re-encrypts it with them as a recipient.
    pub async fn transfer_agent(&self, asset_id: &str, new_owner: &str) -> Result<TxReceipt> {
        let receipt = self.chain.transfer_record(asset_id, new_owner).await?;
        info!(asset_id = %asset_id, new_owner = %new_owner, "Agent transferred");
        Ok(receipt)
    }

    /// Pause or resume the agent.
    pub async fn set_agent_paused(&self, asset_id: &str, paused: bool) -> Result<TxReceipt> {
        let receipt = self.chain.set_paused(asset_id, paused).await?;
        info!(asset_id = %asset_id, paused, "Agent paused state changed");
        Ok(receipt)
    }

    /// Close the on-chain record.
    pub async fn close_agent(&self, asset_id: &str) -> Result<TxReceipt> {
        let receipt = self.chain.close_record(asset_id).await?;
        info!(asset_id = %asset_id, "Agent closed");
        Ok(receipt)
    }

    /// Read the on-chain record without touching the configuration.
    pub async fn get_agent_record(&self, asset_id: &str) -> Result<AgentRecord> {
        self.chain.fetch_record(asset_id).await
    }

    /// Diagnostic: probe which candidate wallets can decrypt the
    /// agent's current configuration. Reports per-candidate outcomes
    /// without failing; used to verify access lists end to end.
    pub async fn test_agent_access(
        &self,
        asset_id: &str,
        candidates: &[SigningKeyPair],
    ) -> Result<Vec<(String, access::AccessOutcome)>> {
        let record = self.chain.fetch_record(asset_id).await?;
        let bytes = self.storage.fetch(&record.metadata_uri).await?;
        let block = SecureBlock::from_bytes(&bytes)?;
        Ok(access::test_access(&block, asset_id, candidates))
    }

    async fn encrypt_and_store(
        &self,
        asset_id: &str,
        config: &Value,
        owner: &SigningKeyPair,
        extra_recipients: &[String],
    ) -> Result<String> {
        let recipients = resolve_recipients(owner, extra_recipients)?;
        let plaintext = serde_json::to_vec(config)
            .map_err(|e| RegistryError::Serialization(e.to_string()))?;

        let block = SecureBlock::build(&plaintext, asset_id, &recipients)?;
        let bytes = block.to_bytes()?;

        debug!(
            backend = self.storage.name(),
            size = bytes.len(),
            "Uploading secure block"
        );
        self.storage.upload(&bytes).await
    }
}

/// Owner first, then the extra base58 identities, each resolved to its
/// sealing key. Listing the owner again among the extras surfaces as
/// `DuplicateRecipient` from the keyring builder.
fn resolve_recipients(
    owner: &SigningKeyPair,
    extras: &[String],
) -> Result<Vec<(String, EncryptionPublicKey)>> {
    let mut recipients = Vec::with_capacity(extras.len() + 1);
    recipients.push((
        owner.identity(),
        *keys::derive_encryption_keypair(owner)?.public(),
    ));
    for identity in extras {
        recipients.push((
            identity.clone(),
            keys::encryption_public_from_identity(identity)?,
        ));
    }
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockRegistry;
    use crate::storage::memory::MemoryBackend;
    use serde_json::json;

    const ASSET: &str = "Mint1111111111111111111111111111111111111111";

    fn client() -> AgentClient {
        AgentClient::new(
            Arc::new(MockRegistry::new()),
            Arc::new(MemoryBackend::new()),
        )
    }

    #[tokio::test]
    async fn test_create_then_read_back() {
        let client = client();
        let owner = SigningKeyPair::generate();
        let config = json!({"name": "Bot", "temperature": 0.2});

        client
            .create_agent(ASSET, &config, &owner, &[])
            .await
            .unwrap();

        let record = client.get_agent_record(ASSET).await.unwrap();
        assert_eq!(record.owner, owner.identity());
        assert_eq!(record.version, 1);

        let read = client.get_agent_config(ASSET, &owner).await.unwrap();
        assert_eq!(read, config);
    }

    #[tokio::test]
    async fn test_protocol_recipient_can_read() {
        let client = client();
        let owner = SigningKeyPair::generate();
        let protocol = SigningKeyPair::generate();
        let config = json!({"name": "Bot"});

        client
            .create_agent(ASSET, &config, &owner, &[protocol.identity()])
            .await
            .unwrap();

        assert_eq!(
            client.get_agent_config(ASSET, &protocol).await.unwrap(),
            config
        );
    }

    #[tokio::test]
    async fn test_outsider_gets_not_authorized() {
        let client = client();
        let owner = SigningKeyPair::generate();
        let outsider = SigningKeyPair::generate();

        client
            .create_agent(ASSET, &json!({"name": "Bot"}), &owner, &[])
            .await
            .unwrap();

        let result = client.get_agent_config(ASSET, &outsider).await;
        assert!(matches!(result, Err(RegistryError::NotAuthorized)));
    }

    #[tokio::test]
    async fn test_update_reencrypts_and_bumps_version() {
        let client = client();
        let owner = SigningKeyPair::generate();
        let partner = SigningKeyPair::generate();

        client
            .create_agent(ASSET, &json!({"v": 1}), &owner, &[])
            .await
            .unwrap();
        let uri_before = client.get_agent_record(ASSET).await.unwrap().metadata_uri;

        // Partner was not a recipient of v1.
        assert!(client.get_agent_config(ASSET, &partner).await.is_err());

        client
            .update_agent_config(ASSET, &json!({"v": 2}), &owner, &[partner.identity()])
            .await
            .unwrap();

        let record = client.get_agent_record(ASSET).await.unwrap();
        assert_eq!(record.version, 2);
        assert_ne!(record.metadata_uri, uri_before);

        assert_eq!(
            client.get_agent_config(ASSET, &partner).await.unwrap(),
            json!({"v": 2})
        );
    }

    #[tokio::test]
    async fn test_owner_in_extras_is_caller_misuse() {
        let client = client();
        let owner = SigningKeyPair::generate();

        let result = client
            .create_agent(ASSET, &json!({}), &owner, &[owner.identity()])
            .await;
        assert!(matches!(result, Err(RegistryError::DuplicateRecipient(_))));
    }

    #[tokio::test]
    async fn test_transfer_does_not_grant_access() {
        let client = client();
        let owner = SigningKeyPair::generate();
        let buyer = SigningKeyPair::generate();

        client
            .create_agent(ASSET, &json!({"name": "Bot"}), &owner, &[])
            .await
            .unwrap();
        client.transfer_agent(ASSET, &buyer.identity()).await.unwrap();

        let record = client.get_agent_record(ASSET).await.unwrap();
        assert_eq!(record.owner, buyer.identity());

        // Ownership moved on-chain, but the stored block still only
        // admits the previous owner's keyring.
        let result = client.get_agent_config(ASSET, &buyer).await;
        assert!(matches!(result, Err(RegistryError::NotAuthorized)));
    }

    #[tokio::test]
    async fn test_access_probe_over_stored_block() {
        let client = client();
        let owner = SigningKeyPair::generate();
        let protocol = SigningKeyPair::generate();
        let outsider = SigningKeyPair::generate();

        client
            .create_agent(ASSET, &json!({"name": "Bot"}), &owner, &[protocol.identity()])
            .await
            .unwrap();

        let report = client
            .test_agent_access(ASSET, &[owner, protocol, outsider])
            .await
            .unwrap();
        assert!(matches!(report[0].1, access::AccessOutcome::Granted));
        assert!(matches!(report[1].1, access::AccessOutcome::Granted));
        assert!(matches!(report[2].1, access::AccessOutcome::NotAuthorized));
    }

    #[tokio::test]
    async fn test_pause_and_close() {
        let client = client();
        let owner = SigningKeyPair::generate();

        client
            .create_agent(ASSET, &json!({}), &owner, &[])
            .await
            .unwrap();

        client.set_agent_paused(ASSET, true).await.unwrap();
        assert!(client.get_agent_record(ASSET).await.unwrap().paused);

        client.close_agent(ASSET).await.unwrap();
        assert!(client.get_agent_record(ASSET).await.is_err());
    }
}
