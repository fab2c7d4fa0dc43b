/// Wallet key material and Ed25519 → X25519 key conversion.
///
/// Recipients are identified by the base58 form of their Ed25519 public
/// signing key. The same wallet key pair deterministically yields the
/// X25519 key pair used for keyring sealing, so a recipient can always
/// re-derive its decryption key from its existing wallet without storing
/// any additional secret.
///
/// The conversion is the standard birational map between the Edwards and
/// Montgomery forms of Curve25519: point decompression + conversion for
/// the public half, the clamped SHA-512-derived scalar for the secret
/// half. The two derivations are kept separate so encryption keys could
/// later rotate independently of the wallet identity.
use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::crypto::sensitive::SensitiveBytes32;
use crate::error::{RegistryError, Result};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SEED_LEN: usize = 32;

/// A wallet's native Ed25519 signing key pair.
///
/// The SDK borrows this for the duration of a single operation and never
/// persists it; custody stays with the wallet collaborator.
pub struct SigningKeyPair {
    signing_key: SigningKey,
}

impl SigningKeyPair {
    /// Generate a fresh key pair (test harnesses and examples).
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: [u8; SEED_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Canonical recipient identity: base58 of the public signing key.
    pub fn identity(&self) -> String {
        bs58::encode(self.verifying_key().as_bytes()).into_string()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// X25519 public key a content key can be sealed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionPublicKey([u8; PUBLIC_KEY_LEN]);

impl EncryptionPublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

/// X25519 key pair derived from a wallet signing key pair.
///
/// Computed on demand, never cached across calls; the secret half is
/// zeroized on drop.
pub struct EncryptionKeyPair {
    public: EncryptionPublicKey,
    secret: SensitiveBytes32,
}

impl EncryptionKeyPair {
    pub fn public(&self) -> &EncryptionPublicKey {
        &self.public
    }

    pub(crate) fn secret_bytes(&self) -> &[u8; 32] {
        self.secret.as_bytes()
    }
}

/// Derive the full encryption key pair from a wallet signing key pair.
///
/// Deterministic: the same signing key always yields the same encryption
/// key pair.
pub fn derive_encryption_keypair(signing: &SigningKeyPair) -> Result<EncryptionKeyPair> {
    let public = convert_public_key(signing.verifying_key().as_bytes())?;
    // Clamped scalar from the SHA-512 expansion of the Ed25519 seed; this
    // is the X25519 secret matching the converted public point.
    let secret = SensitiveBytes32::new(signing.signing_key().to_scalar_bytes());
    Ok(EncryptionKeyPair { public, secret })
}

/// Convert an Ed25519 public key to its X25519 counterpart.
pub fn convert_public_key(ed25519_pk: &[u8; PUBLIC_KEY_LEN]) -> Result<EncryptionPublicKey> {
    let point = CompressedEdwardsY::from_slice(ed25519_pk)
        .map_err(|_| RegistryError::KeyConversion("invalid compressed point encoding".into()))?
        .decompress()
        .ok_or_else(|| {
            RegistryError::KeyConversion("public key is not a valid Edwards point".into())
        })?;
    Ok(EncryptionPublicKey(point.to_montgomery().to_bytes()))
}

/// Resolve a recipient's base58 identity into their sealing key.
pub fn encryption_public_from_identity(identity: &str) -> Result<EncryptionPublicKey> {
    let bytes = bs58::decode(identity)
        .into_vec()
        .map_err(|e| RegistryError::KeyConversion(format!("invalid base58 identity: {e}")))?;
    let pk: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
        RegistryError::KeyConversion(format!(
            "expected {PUBLIC_KEY_LEN}-byte public key, got {}",
            v.len()
        ))
    })?;
    convert_public_key(&pk)
}
