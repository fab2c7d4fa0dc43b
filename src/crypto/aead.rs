/// XChaCha20-Poly1305 content cipher for agent configuration payloads.
///
/// Each secure block gets a fresh random 256-bit content key and a
/// random 24-byte nonce. The extended XChaCha20 nonce is large enough
/// for random generation without practical collision risk, so no counter
/// state is carried between calls. The associated-data string binds the
/// ciphertext to a specific on-chain asset; it is authenticated but
/// travels in the clear.
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use crate::crypto::sensitive::SensitiveBytes32;
use crate::error::{RegistryError, Result};

pub const NONCE_LEN: usize = 24;
pub const KEY_LEN: usize = 32;
pub const TAG_LEN: usize = 16;

/// Wire identifier of the one cipher this implementation supports.
pub const AEAD_ALGORITHM: &str = "xchacha20poly1305-ietf";

/// One-time symmetric key protecting a single secure block's payload.
pub type ContentKey = SensitiveBytes32;

/// Generate a fresh random content key.
pub fn generate_content_key() -> ContentKey {
    ContentKey::random()
}

/// Generate a random 24-byte nonce.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt a configuration payload under a content key.
///
/// Returns (nonce, ciphertext_with_tag).
pub fn encrypt(
    key: &ContentKey,
    plaintext: &[u8],
    associated_data: &str,
) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| RegistryError::Encryption(e.to_string()))?;

    let nonce_bytes = generate_nonce();
    let nonce = XNonce::from_slice(&nonce_bytes);

    let payload = Payload {
        msg: plaintext,
        aad: associated_data.as_bytes(),
    };

    let ciphertext = cipher
        .encrypt(nonce, payload)
        .map_err(|e| RegistryError::Encryption(e.to_string()))?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt a configuration payload.
///
/// Fails closed: tag mismatch, truncation and associated-data mismatch
/// are indistinguishable `DecryptionFailed` outcomes, and no partial
/// plaintext is ever returned.
pub fn decrypt(
    key: &ContentKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    associated_data: &str,
) -> Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| RegistryError::DecryptionFailed)?;

    let payload = Payload {
        msg: ciphertext,
        aad: associated_data.as_bytes(),
    };

    cipher
        .decrypt(XNonce::from_slice(nonce), payload)
        .map_err(|_| RegistryError::DecryptionFailed)
}
