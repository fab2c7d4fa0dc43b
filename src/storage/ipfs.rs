/// IPFS storage backend via HTTP API.
///
/// Secure blocks are content-addressed: the CID returned by the add call
/// becomes the `ipfs://<cid>` URI stored on-chain. Uses the IPFS HTTP
/// API (typically Kubo at localhost:5001).
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::StorageBackend;
use crate::error::{RegistryError, Result};

/// Configuration for the IPFS HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsConfig {
    /// IPFS API endpoint (e.g., "http://localhost:5001").
    pub api_url: String,
}

pub struct IpfsBackend {
    client: Client,
    config: IpfsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IpfsAddResponse {
    hash: String,
}

impl IpfsBackend {
    pub fn new(config: IpfsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn cid_from_uri(uri: &str) -> Result<&str> {
        uri.strip_prefix("ipfs://")
            .ok_or_else(|| RegistryError::Storage(format!("not an ipfs URI: {uri}")))
    }
}

#[async_trait]
impl StorageBackend for IpfsBackend {
    fn name(&self) -> &str {
        "IPFS"
    }

    async fn upload(&self, data: &[u8]) -> Result<String> {
        let part = multipart::Part::bytes(data.to_vec()).file_name("block");
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(format!("{}/api/v0/add", self.config.api_url))
            .query(&[("pin", "true"), ("cid-version", "1")])
            .multipart(form)
            .send()
            .await
            .map_err(|e| RegistryError::Storage(format!("IPFS add failed: {e}")))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Storage(format!("IPFS add failed: {body}")));
        }

        let add_resp: IpfsAddResponse = resp
            .json()
            .await
            .map_err(|e| RegistryError::Storage(format!("IPFS response parse error: {e}")))?;

        debug!(cid = %add_resp.hash, size = data.len(), "Secure block pinned");
        Ok(format!("ipfs://{}", add_resp.hash))
    }

    async fn fetch(&self, uri: &str) -> Result<Vec<u8>> {
        let cid = Self::cid_from_uri(uri)?;

        let resp = self
            .client
            .post(format!("{}/api/v0/cat", self.config.api_url))
            .query(&[("arg", cid)])
            .send()
            .await
            .map_err(|e| RegistryError::Storage(format!("IPFS cat failed: {e}")))?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::Storage(format!("IPFS cat failed: {body}")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RegistryError::Storage(format!("IPFS cat failed: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cid_from_uri() {
        assert_eq!(IpfsBackend::cid_from_uri("ipfs://bafyabc").unwrap(), "bafyabc");
        assert!(IpfsBackend::cid_from_uri("https://example.com/x").is_err());
    }
}
