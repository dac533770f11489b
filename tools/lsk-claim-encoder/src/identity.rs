//! Source account identity.
//!
//! Lisk keys are NaCl-style 64-byte secrets: `seed(32) || publicKey(32)`.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::errors::IdentityError;
use crate::lisk32::lisk32_from_public_key;

pub const PRIVATE_KEY_LEN: usize = 64;
pub const PUBLIC_KEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

/// Immutable identity of one source account.
///
/// `public_key` and `source_address` are pure functions of the key material.
/// Key material is never printed: `Debug` only shows the address.
#[derive(Clone)]
pub struct AccountIdentity {
    signing_key: SigningKey,
    public_key: [u8; PUBLIC_KEY_LEN],
    source_address: String,
}

impl AccountIdentity {
    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }

    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.public_key))
    }

    /// Lisk32 address (`lsk...`).
    pub fn source_address(&self) -> &str {
        &self.source_address
    }
}

impl fmt::Debug for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountIdentity")
            .field("public_key", &self.public_key_hex())
            .field("source_address", &self.source_address)
            .finish_non_exhaustive()
    }
}

/// Decode hex private key text (optional `0x` prefix, surrounding whitespace ignored).
pub fn parse_private_key(text: &str) -> Result<Vec<u8>, IdentityError> {
    let trimmed = text.trim();
    let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(raw).map_err(|_| IdentityError::InvalidHex)
}

/// Derive public key and Lisk32 address from raw key bytes.
pub fn derive_identity(private_key: &[u8]) -> Result<AccountIdentity, IdentityError> {
    let keypair: &[u8; PRIVATE_KEY_LEN] =
        private_key.try_into().map_err(|_| IdentityError::InvalidLength {
            expected: PRIVATE_KEY_LEN,
            actual: private_key.len(),
        })?;

    // Rejects keys whose trailing half is not the seed's public key.
    let signing_key =
        SigningKey::from_keypair_bytes(keypair).map_err(|_| IdentityError::PublicKeyMismatch)?;
    let public_key = signing_key.verifying_key().to_bytes();
    let source_address = lisk32_from_public_key(&public_key);

    Ok(AccountIdentity {
        signing_key,
        public_key,
        source_address,
    })
}

/// Detached Ed25519 signature over raw message bytes.
pub fn sign(identity: &AccountIdentity, message: &[u8]) -> [u8; SIGNATURE_LEN] {
    identity.signing_key.sign(message).to_bytes()
}

pub fn verify(
    public_key: &[u8; PUBLIC_KEY_LEN],
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(signature)).is_ok()
}
