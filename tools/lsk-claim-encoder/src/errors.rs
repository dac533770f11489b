use thiserror::Error;

/// Errors while turning private key text into an [`crate::AccountIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("private key is not valid hex")]
    InvalidHex,
    #[error("private key must be {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("private key does not embed the public key derived from its seed")]
    PublicKeyMismatch,
}
