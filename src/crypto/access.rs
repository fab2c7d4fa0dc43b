/// Locates a wallet's keyring entry and recovers the plaintext
/// configuration.
///
/// `NotAuthorized` is the expected outcome for wallets that are simply
/// not on the access list; it is kept distinct from the malformed-block
/// and integrity-failure errors so callers can present it as "no access"
/// rather than "corrupted".
use crate::crypto::aead;
use crate::crypto::block::{associated_data_for, SecureBlock};
use crate::crypto::keyring;
use crate::crypto::keys::{self, SigningKeyPair};
use crate::error::{RegistryError, Result};

/// Decrypt a secure block for one wallet.
///
/// Verifies the asset binding, derives the wallet's encryption key pair,
/// unseals its keyring entry and decrypts the payload. Any integrity
/// failure is fatal; nothing is retried or partially trusted.
pub fn open(block: &SecureBlock, asset_id: &str, signing: &SigningKeyPair) -> Result<Vec<u8>> {
    let expected = associated_data_for(asset_id);
    if block.associated_data != expected {
        return Err(RegistryError::AssetMismatch {
            expected,
            found: block.associated_data.clone(),
        });
    }

    let keypair = keys::derive_encryption_keypair(signing)?;

    let identity = signing.identity();
    let sealed = block
        .keyring
        .get(&identity)
        .ok_or(RegistryError::NotAuthorized)?;

    let content_key = keyring::unseal_entry(&keypair, sealed)?;

    aead::decrypt(
        &content_key,
        &block.nonce,
        &block.ciphertext,
        &block.associated_data,
    )
}

/// Per-candidate result of an access probe.
#[derive(Debug)]
pub enum AccessOutcome {
    /// The candidate decrypted the payload.
    Granted,
    /// The candidate is not a keyring recipient.
    NotAuthorized,
    /// Some other failure (corrupt entry, asset mismatch, ...).
    Failed(String),
}

/// Probe a block against a list of candidate wallets.
///
/// Runs the full open path independently for each candidate and reports
/// the outcome without failing, for verifying access-list correctness
/// end to end.
pub fn test_access(
    block: &SecureBlock,
    asset_id: &str,
    candidates: &[SigningKeyPair],
) -> Vec<(String, AccessOutcome)> {
    candidates
        .iter()
        .map(|candidate| {
            let outcome = match open(block, asset_id, candidate) {
                Ok(_) => AccessOutcome::Granted,
                Err(RegistryError::NotAuthorized) => AccessOutcome::NotAuthorized,
                Err(e) => AccessOutcome::Failed(e.to_string()),
            };
            (candidate.identity(), outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{derive_encryption_keypair, EncryptionPublicKey};

    const ASSET: &str = "Mint1111111111111111111111111111111111111111";

    fn recipient_entry(signing: &SigningKeyPair) -> (String, EncryptionPublicKey) {
        let public = *derive_encryption_keypair(signing).unwrap().public();
        (signing.identity(), public)
    }

    #[test]
    fn test_every_recipient_can_open() {
        let owner = SigningKeyPair::generate();
        let protocol = SigningKeyPair::generate();
        let plaintext = br#"{"name":"Bot"}"#;

        let block = SecureBlock::build(
            plaintext,
            ASSET,
            &[recipient_entry(&owner), recipient_entry(&protocol)],
        )
        .unwrap();

        assert_eq!(open(&block, ASSET, &owner).unwrap(), plaintext);
        assert_eq!(open(&block, ASSET, &protocol).unwrap(), plaintext);
    }

    #[test]
    fn test_outsider_is_not_authorized() {
        let owner = SigningKeyPair::generate();
        let outsider = SigningKeyPair::generate();

        let block = SecureBlock::build(b"secret", ASSET, &[recipient_entry(&owner)]).unwrap();

        let result = open(&block, ASSET, &outsider);
        assert!(matches!(result, Err(RegistryError::NotAuthorized)));
    }

    #[test]
    fn test_wrong_asset_is_a_binding_failure() {
        let owner = SigningKeyPair::generate();
        let block = SecureBlock::build(b"secret", ASSET, &[recipient_entry(&owner)]).unwrap();

        // A legitimate recipient still cannot open the block under a
        // different asset identity.
        match open(&block, "Mint222", &owner) {
            Err(RegistryError::AssetMismatch { expected, found }) => {
                assert_eq!(expected, "mint:Mint222");
                assert_eq!(found, format!("mint:{ASSET}"));
            }
            other => panic!("expected AssetMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_tampered_ciphertext_detected() {
        let owner = SigningKeyPair::generate();
        let mut block = SecureBlock::build(b"secret", ASSET, &[recipient_entry(&owner)]).unwrap();
        block.ciphertext[3] ^= 0x01;

        let result = open(&block, ASSET, &owner);
        assert!(matches!(result, Err(RegistryError::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_nonce_detected() {
        let owner = SigningKeyPair::generate();
        let mut block = SecureBlock::build(b"secret", ASSET, &[recipient_entry(&owner)]).unwrap();
        block.nonce[0] ^= 0x01;

        let result = open(&block, ASSET, &owner);
        assert!(matches!(result, Err(RegistryError::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_keyring_entry_detected() {
        let owner = SigningKeyPair::generate();
        let mut block = SecureBlock::build(b"secret", ASSET, &[recipient_entry(&owner)]).unwrap();
        let identity = owner.identity();
        block.keyring.get_mut(&identity).unwrap()[10] ^= 0x01;

        let result = open(&block, ASSET, &owner);
        assert!(matches!(result, Err(RegistryError::KeyUnsealFailed)));
    }

    #[test]
    fn test_access_probe_reports_per_candidate() {
        let owner = SigningKeyPair::generate();
        let protocol = SigningKeyPair::generate();
        let outsider = SigningKeyPair::generate();

        let block = SecureBlock::build(
            br#"{"name":"Bot"}"#,
            ASSET,
            &[recipient_entry(&owner), recipient_entry(&protocol)],
        )
        .unwrap();

        let report = test_access(&block, ASSET, &[owner, protocol, outsider]);
        assert_eq!(report.len(), 3);
        assert!(matches!(report[0].1, AccessOutcome::Granted));
        assert!(matches!(report[1].1, AccessOutcome::Granted));
        assert!(matches!(report[2].1, AccessOutcome::NotAuthorized));
    }

    #[test]
    fn test_access_probe_never_panics_on_corrupt_block() {
        let owner = SigningKeyPair::generate();
        let mut block =
            SecureBlock::build(b"secret", ASSET, &[recipient_entry(&owner)]).unwrap();
        let identity = owner.identity();
        block.keyring.get_mut(&identity).unwrap().truncate(4);

        let report = test_access(&block, ASSET, &[owner]);
        assert!(matches!(report[0].1, AccessOutcome::Failed(_)));
    }
}
