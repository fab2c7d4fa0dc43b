/// Confidential envelope encryption for agent configuration blobs.
///
/// The flow is: generate a fresh content key, encrypt the configuration
/// with XChaCha20-Poly1305 bound to the asset's identity, seal one copy
/// of the content key per authorized recipient, and package the result
/// as a versioned `SecureBlock` handed to the storage collaborator.
/// Recipients re-derive their decryption key from their wallet signing
/// key, so nothing beyond the wallet needs to be stored.
pub mod access;
pub mod aead;
pub mod block;
pub mod keyring;
pub mod keys;
pub mod sensitive;
