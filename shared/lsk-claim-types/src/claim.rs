use alloy_primitives::{Address, B256};

/// Single-signer claim entry point on the destination claim contract.
pub const CLAIM_REGULAR_ACCOUNT: &str = "claimRegularAccount";

/// Ed25519 signature split into the two words the verifier expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignatureParts {
    pub r: B256,
    pub s: B256,
}

impl From<[u8; 64]> for SignatureParts {
    fn from(sig: [u8; 64]) -> Self {
        Self {
            r: B256::from_slice(&sig[0..32]),
            s: B256::from_slice(&sig[32..64]),
        }
    }
}

impl SignatureParts {
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out
    }
}

/// Arguments of `claimRegularAccount(bytes32[],bytes32,uint64,address,(bytes32,bytes32))`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimArgs {
    pub proof: Vec<B256>,
    pub public_key: B256,
    pub amount: u64,
    pub recipient: Address,
    pub signature: SignatureParts,
}
