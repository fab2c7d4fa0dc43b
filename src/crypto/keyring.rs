/// Multi-recipient keyring: one sealed copy of the content key per
/// authorized recipient.
///
/// Entries use anonymous sealed boxes (ephemeral X25519 + XSalsa20-
/// Poly1305). No sender authentication is needed: the content key is
/// already bound to an authenticated payload through the AEAD tag.
/// Entries are independent alternatives, not a threshold scheme — every
/// entry unwraps to the same content key.
use std::collections::BTreeMap;

use crypto_box::{PublicKey as SealPublicKey, SecretKey as SealSecretKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::crypto::aead::{ContentKey, KEY_LEN, TAG_LEN};
use crate::crypto::keys::{EncryptionKeyPair, EncryptionPublicKey};
use crate::error::{RegistryError, Result};

/// Ephemeral public key (32) + Poly1305 tag + sealed content key.
pub const SEALED_ENTRY_LEN: usize = 32 + TAG_LEN + KEY_LEN;

/// Map from recipient identity (base58 signing public key) to that
/// recipient's sealed copy of the content key.
pub type Keyring = BTreeMap<String, Vec<u8>>;

/// Seal the content key once per recipient.
///
/// The recipient list must be non-empty and free of duplicate
/// identities; a silent overwrite would be a silent access-list bug.
pub fn build_keyring(
    content_key: &ContentKey,
    recipients: &[(String, EncryptionPublicKey)],
) -> Result<Keyring> {
    if recipients.is_empty() {
        return Err(RegistryError::NoRecipients);
    }

    let mut keyring = Keyring::new();
    for (identity, public) in recipients {
        if keyring.contains_key(identity) {
            return Err(RegistryError::DuplicateRecipient(identity.clone()));
        }
        let pk = SealPublicKey::from(*public.as_bytes());
        let sealed = pk
            .seal(&mut OsRng, content_key.as_bytes())
            .map_err(|_| RegistryError::Encryption("sealing content key failed".into()))?;
        keyring.insert(identity.clone(), sealed);
    }
    Ok(keyring)
}

/// Unseal one keyring entry with the recipient's derived secret key.
pub fn unseal_entry(keypair: &EncryptionKeyPair, sealed: &[u8]) -> Result<ContentKey> {
    let sk = SealSecretKey::from(*keypair.secret_bytes());
    let mut key_bytes = sk.unseal(sealed).map_err(|_| RegistryError::KeyUnsealFailed)?;
    let content_key = ContentKey::from_slice(&key_bytes);
    key_bytes.zeroize();
    content_key.ok_or(RegistryError::KeyUnsealFailed)
}
