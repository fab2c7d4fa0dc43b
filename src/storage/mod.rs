/// Off-chain blob storage collaborator.
///
/// The serialized secure block is an opaque payload here; backends never
/// see plaintext or key material. Upload returns a URI the on-chain
/// record points at, fetch resolves that URI back to bytes. Retries,
/// provider selection and transport security belong to the backend, not
/// to the envelope core.
pub mod ipfs;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for pluggable blob storage backends.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Human-readable name of this backend (e.g., "IPFS").
    fn name(&self) -> &str;

    /// Upload an opaque blob. Returns the URI to store on-chain.
    async fn upload(&self, data: &[u8]) -> Result<String>;

    /// Fetch a blob by the URI previously returned from `upload`.
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>>;
}
