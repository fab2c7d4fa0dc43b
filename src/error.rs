use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Key conversion failed: {0}")]
    KeyConversion(String),

    #[error("Recipient list is empty")]
    NoRecipients,

    #[error("Duplicate recipient: {0}")]
    DuplicateRecipient(String),

    #[error("Unsupported secure block version: {0}")]
    UnsupportedVersion(u64),

    #[error("Unsupported AEAD algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Malformed secure block: {0}")]
    MalformedBlock(String),

    #[error("Associated data mismatch: block is bound to {found:?}, expected {expected:?}")]
    AssetMismatch { expected: String, found: String },

    #[error("Signer is not a keyring recipient for this block")]
    NotAuthorized,

    #[error("Failed to unseal keyring entry")]
    KeyUnsealFailed,

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Registry error: {0}")]
    Chain(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RegistryError {
    /// True for the expected "this wallet simply has no access" outcome,
    /// which callers must not surface as corruption or log as an error.
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, RegistryError::NotAuthorized)
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
