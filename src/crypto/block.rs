/// Versioned wire format for the confidential configuration block.
///
/// Serialized shape (JSON, binary fields base64):
/// `{ "ver": 1, "aead": "xchacha20poly1305-ietf", "ad": "mint:<asset>",
///    "nonce": "...", "ciphertext": "...", "keyring": { "<base58 pk>": "..." } }`
///
/// Parsing is strict: unknown versions and algorithms are rejected, never
/// guessed at, and malformed input is never repaired. A block is immutable
/// once built; a configuration update produces a new block with a fresh
/// content key, nonce and keyring.
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::crypto::aead::{self, AEAD_ALGORITHM, NONCE_LEN, TAG_LEN};
use crate::crypto::keyring::{self, Keyring};
use crate::crypto::keys::EncryptionPublicKey;
use crate::error::{RegistryError, Result};

pub const BLOCK_VERSION: u64 = 1;

/// Associated-data string binding a block to one on-chain asset.
pub fn associated_data_for(asset_id: &str) -> String {
    format!("mint:{asset_id}")
}

/// The persisted artifact: AEAD ciphertext plus per-recipient keyring.
#[derive(Debug, Clone)]
pub struct SecureBlock {
    pub version: u64,
    pub aead_algorithm: String,
    pub associated_data: String,
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub keyring: Keyring,
}

#[derive(Serialize, Deserialize)]
struct WireBlock {
    ver: u64,
    aead: String,
    ad: String,
    nonce: String,
    ciphertext: String,
    keyring: BTreeMap<String, String>,
}

impl SecureBlock {
    /// Encrypt a configuration payload for a set of recipients.
    ///
    /// Recipient validation runs first, so an empty or duplicated list
    /// fails before any ciphertext is produced.
    pub fn build(
        plaintext: &[u8],
        asset_id: &str,
        recipients: &[(String, EncryptionPublicKey)],
    ) -> Result<Self> {
        let content_key = aead::generate_content_key();
        let keyring = keyring::build_keyring(&content_key, recipients)?;

        let associated_data = associated_data_for(asset_id);
        let (nonce, ciphertext) = aead::encrypt(&content_key, plaintext, &associated_data)?;

        Ok(Self {
            version: BLOCK_VERSION,
            aead_algorithm: AEAD_ALGORITHM.to_string(),
            associated_data,
            nonce,
            ciphertext,
            keyring,
        })
    }

    /// Serialize for hand-off to the storage collaborator.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let wire = WireBlock {
            ver: self.version,
            aead: self.aead_algorithm.clone(),
            ad: self.associated_data.clone(),
            nonce: BASE64.encode(self.nonce),
            ciphertext: BASE64.encode(&self.ciphertext),
            keyring: self
                .keyring
                .iter()
                .map(|(id, sealed)| (id.clone(), BASE64.encode(sealed)))
                .collect(),
        };
        serde_json::to_vec(&wire).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    /// Parse and validate a stored block.
    ///
    /// The version tag is checked before anything else so that a block
    /// from a future format fails with `UnsupportedVersion` rather than
    /// a shape error.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| RegistryError::MalformedBlock(format!("not a JSON object: {e}")))?;

        let ver = value
            .get("ver")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| RegistryError::MalformedBlock("missing or non-integer \"ver\"".into()))?;
        if ver != BLOCK_VERSION {
            return Err(RegistryError::UnsupportedVersion(ver));
        }

        let wire: WireBlock = serde_json::from_value(value)
            .map_err(|e| RegistryError::MalformedBlock(e.to_string()))?;

        if wire.aead != AEAD_ALGORITHM {
            return Err(RegistryError::UnsupportedAlgorithm(wire.aead));
        }

        let nonce_bytes = BASE64
            .decode(&wire.nonce)
            .map_err(|e| RegistryError::MalformedBlock(format!("nonce: {e}")))?;
        let nonce: [u8; NONCE_LEN] = nonce_bytes.try_into().map_err(|v: Vec<u8>| {
            RegistryError::MalformedBlock(format!("nonce must be {NONCE_LEN} bytes, got {}", v.len()))
        })?;

        let ciphertext = BASE64
            .decode(&wire.ciphertext)
            .map_err(|e| RegistryError::MalformedBlock(format!("ciphertext: {e}")))?;
        if ciphertext.len() < TAG_LEN {
            return Err(RegistryError::MalformedBlock(
                "ciphertext shorter than authentication tag".into(),
            ));
        }

        if wire.keyring.is_empty() {
            return Err(RegistryError::MalformedBlock("keyring is empty".into()));
        }
        let mut keyring = Keyring::new();
        for (identity, sealed) in &wire.keyring {
            let sealed = BASE64
                .decode(sealed)
                .map_err(|e| RegistryError::MalformedBlock(format!("keyring entry: {e}")))?;
            keyring.insert(identity.clone(), sealed);
        }

        Ok(Self {
            version: wire.ver,
            aead_algorithm: wire.aead,
            associated_data: wire.ad,
            nonce,
            ciphertext,
            keyring,
        })
    }
}
