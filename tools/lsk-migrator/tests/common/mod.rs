//! In-memory stand-ins for the claim API and the claim contract.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use lsk_claim_encoder::{claim_message, derive_identity, verify, AccountIdentity};
use lsk_claim_types::{ClaimArgs, EligibilityRecord, MultisigMembership};
use lsk_migrator::{ClaimContract, EligibilityOracle, MigrationError, ReceiptStatus, SecretKeyText};

pub const DESTINATION: Address = Address::new([0xaa; 20]);
pub const TIMEOUT: Duration = Duration::from_secs(5);

/// A source account with a deterministic key.
pub struct TestAccount {
    pub key: SecretKeyText,
    pub identity: AccountIdentity,
    pub signing_hash: B256,
}

impl TestAccount {
    pub fn new(seed: u8) -> Self {
        let keypair = SigningKey::from_bytes(&[seed; 32]).to_keypair_bytes();
        let identity = derive_identity(&keypair).unwrap();
        Self {
            key: SecretKeyText::new(hex::encode(keypair)),
            identity,
            signing_hash: B256::repeat_byte(seed),
        }
    }

    pub fn address(&self) -> String {
        self.identity.source_address().to_string()
    }

    pub fn public_key(&self) -> B256 {
        B256::from(*self.identity.public_key())
    }

    pub fn eligible(&self, balance: u64) -> EligibilityRecord {
        EligibilityRecord {
            is_eligible: true,
            balance,
            signing_hash: self.signing_hash,
            membership_proof: vec![B256::repeat_byte(0xee)],
            multisig_memberships: Vec::new(),
        }
    }
}

pub fn membership(address: &str) -> MultisigMembership {
    MultisigMembership {
        lsk_address: address.to_string(),
        number_of_signatures: Some(2),
    }
}

/// Oracle answering from a fixed table; unknown addresses are not eligible.
#[derive(Default)]
pub struct MockOracle {
    records: HashMap<String, Result<EligibilityRecord, MigrationError>>,
    pub queried: Mutex<Vec<String>>,
}

impl MockOracle {
    pub fn with(mut self, address: String, answer: Result<EligibilityRecord, MigrationError>) -> Self {
        self.records.insert(address, answer);
        self
    }
}

#[async_trait]
impl EligibilityOracle for MockOracle {
    async fn check_eligibility(&self, source_address: &str) -> Result<EligibilityRecord, MigrationError> {
        self.queried.lock().unwrap().push(source_address.to_string());
        self.records
            .get(source_address)
            .cloned()
            .unwrap_or_else(|| Ok(EligibilityRecord::not_eligible(Vec::new())))
    }
}

/// What the mined transaction does for a given public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mining {
    Confirm,
    Revert,
    NeverMined,
}

/// Claim contract with on-chain style replay protection and signature checks.
#[derive(Default)]
pub struct MockClaimContract {
    /// public key -> signing hash the verifier expects
    leaves: HashMap<B256, B256>,
    simulate_reverts: HashMap<B256, String>,
    mining: HashMap<B256, Mining>,
    broadcast_fails: HashSet<B256>,
    claimed: Mutex<HashSet<B256>>,
    pending: Mutex<HashMap<B256, B256>>,
    pub broadcasts: Mutex<Vec<ClaimArgs>>,
}

impl MockClaimContract {
    pub fn with_account(mut self, account: &TestAccount) -> Self {
        self.leaves.insert(account.public_key(), account.signing_hash);
        self
    }

    pub fn reverting(mut self, account: &TestAccount, reason: &str) -> Self {
        self.simulate_reverts.insert(account.public_key(), reason.to_string());
        self
    }

    pub fn mining(mut self, account: &TestAccount, mining: Mining) -> Self {
        self.mining.insert(account.public_key(), mining);
        self
    }

    pub fn failing_broadcast(mut self, account: &TestAccount) -> Self {
        self.broadcast_fails.insert(account.public_key());
        self
    }

    pub fn is_claimed(&self, account: &TestAccount) -> bool {
        self.claimed.lock().unwrap().contains(&account.public_key())
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.lock().unwrap().len()
    }
}

#[async_trait]
impl ClaimContract for MockClaimContract {
    async fn simulate(&self, args: &ClaimArgs) -> Result<(), MigrationError> {
        if self.claimed.lock().unwrap().contains(&args.public_key) {
            return Err(MigrationError::SimulationReverted(
                "L2Claim: already claimed".to_string(),
            ));
        }
        if let Some(reason) = self.simulate_reverts.get(&args.public_key) {
            return Err(MigrationError::SimulationReverted(reason.clone()));
        }
        if let Some(signing_hash) = self.leaves.get(&args.public_key) {
            let message = claim_message(*signing_hash, args.recipient);
            if !verify(&args.public_key.0, message.as_bytes(), &args.signature.to_bytes()) {
                return Err(MigrationError::SimulationReverted(
                    "L2Claim: invalid signature".to_string(),
                ));
            }
        }
        Ok(())
    }

    async fn broadcast(&self, args: &ClaimArgs) -> Result<B256, MigrationError> {
        if self.broadcast_fails.contains(&args.public_key) {
            return Err(MigrationError::BroadcastFailed("connection reset".to_string()));
        }
        let mut broadcasts = self.broadcasts.lock().unwrap();
        broadcasts.push(args.clone());
        let tx_hash = B256::with_last_byte(broadcasts.len() as u8);
        self.pending.lock().unwrap().insert(tx_hash, args.public_key);
        Ok(tx_hash)
    }

    async fn await_receipt(
        &self,
        tx_hash: B256,
        _timeout: Duration,
    ) -> Result<ReceiptStatus, MigrationError> {
        let public_key = self.pending.lock().unwrap()[&tx_hash];
        match self.mining.get(&public_key).copied().unwrap_or(Mining::Confirm) {
            Mining::Confirm => {
                self.claimed.lock().unwrap().insert(public_key);
                Ok(ReceiptStatus::Success)
            }
            Mining::Revert => Ok(ReceiptStatus::Reverted),
            Mining::NeverMined => Err(MigrationError::ConfirmationTimeout {
                tx_hash,
                reason: "no receipt within 5s".to_string(),
            }),
        }
    }
}
