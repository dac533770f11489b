use alloy_primitives::{Address, B256};
use alloy_sol_types::SolValue;
use lsk_claim_types::{ClaimArgs, EligibilityRecord, SignatureParts};
use sha3::{Digest, Keccak256};

use crate::identity::{sign, AccountIdentity};

/// Zero bytes appended after the digest. The on-chain verifier rebuilds the
/// message with the same suffix, so this never changes.
pub const CLAIM_MESSAGE_PADDING: usize = 9;
pub const CLAIM_MESSAGE_LEN: usize = 32 + CLAIM_MESSAGE_PADDING;

/// Bytes signed by the source key to authorise a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimMessage([u8; CLAIM_MESSAGE_LEN]);

impl ClaimMessage {
    pub fn as_bytes(&self) -> &[u8; CLAIM_MESSAGE_LEN] {
        &self.0
    }

    pub fn digest(&self) -> B256 {
        B256::from_slice(&self.0[..32])
    }
}

impl AsRef<[u8]> for ClaimMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// `keccak256(abi.encode(bytes32 signingHash, address recipient)) || 0x00 * 9`.
pub fn claim_message(signing_hash: B256, recipient: Address) -> ClaimMessage {
    let encoded = (signing_hash, recipient).abi_encode_params();
    let digest = B256::from_slice(&Keccak256::digest(&encoded));

    let mut out = [0u8; CLAIM_MESSAGE_LEN];
    out[..32].copy_from_slice(digest.as_slice());
    ClaimMessage(out)
}

/// Build the message, sign it with the source key and assemble the
/// `claimRegularAccount` arguments.
pub fn prepare_claim(
    recipient: Address,
    eligibility: &EligibilityRecord,
    identity: &AccountIdentity,
) -> ClaimArgs {
    let message = claim_message(eligibility.signing_hash, recipient);
    let signature = sign(identity, message.as_bytes());

    ClaimArgs {
        proof: eligibility.membership_proof.clone(),
        public_key: B256::from(*identity.public_key()),
        amount: eligibility.balance,
        recipient,
        signature: SignatureParts::from(signature),
    }
}
