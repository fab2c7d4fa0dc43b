/// Content-addressed in-memory storage double.
///
/// Injected wherever a test needs the full create/fetch flow without a
/// network. URIs are `mem://<blake3 hex>` so identical blobs land at
/// identical addresses, matching the content-addressed semantics of the
/// real backends.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StorageBackend;
use crate::error::{RegistryError, Result};

#[derive(Default)]
pub struct MemoryBackend {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn upload(&self, data: &[u8]) -> Result<String> {
        let uri = format!("mem://{}", hex::encode(blake3::hash(data).as_bytes()));
        self.blobs
            .write()
            .await
            .insert(uri.clone(), data.to_vec());
        Ok(uri)
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| RegistryError::Storage(format!("no blob at {uri}")))
    }
}
