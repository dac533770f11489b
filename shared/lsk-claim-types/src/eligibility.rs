use alloy_primitives::B256;
use serde::Deserialize;

/// A multisig account the source address is a member of.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigMembership {
    pub lsk_address: String,
    #[serde(default)]
    pub number_of_signatures: Option<u32>,
}

/// Oracle answer for one source address.
///
/// Only valid for the claim attempt it was fetched for; never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EligibilityRecord {
    pub is_eligible: bool,
    /// Claimable balance in beddows (1 LSK = 10^8 beddows).
    pub balance: u64,
    /// Leaf hash the source key has to sign over (together with the recipient).
    pub signing_hash: B256,
    /// Merkle proof nodes, passed to the contract untouched.
    pub membership_proof: Vec<B256>,
    pub multisig_memberships: Vec<MultisigMembership>,
}

impl EligibilityRecord {
    /// Record for an address the oracle has nothing for.
    pub fn not_eligible(multisig_memberships: Vec<MultisigMembership>) -> Self {
        Self {
            is_eligible: false,
            balance: 0,
            signing_hash: B256::ZERO,
            membership_proof: Vec::new(),
            multisig_memberships,
        }
    }

    pub fn has_multisig_memberships(&self) -> bool {
        !self.multisig_memberships.is_empty()
    }
}
