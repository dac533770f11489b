//! Migration driver: one account at a time, in input order.
//!
//! Per account the states are strictly linear:
//!
//! ```text
//! Pending -> IdentityDerived -> EligibilityChecked -> Skipped
//!                                                  -> MessageSigned -> Submitted -> Confirmed
//!                                                                               -> Reverted
//!                                                                               -> SubmissionFailed
//! ```
//!
//! Any earlier stage may end in `Failed`. Whatever an account ends in, the
//! driver moves on to the next one.

use std::time::Duration;

use alloy_primitives::{Address, B256};
use lsk_claim_encoder::{derive_identity, parse_private_key, AccountIdentity};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::{
    config::SecretKeyText,
    error::MigrationError,
    oracle::EligibilityOracle,
    submitter::{submit_claim, ClaimContract},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountState {
    Pending,
    IdentityDerived,
    EligibilityChecked,
    MessageSigned,
    Submitted,
    Skipped,
    Confirmed,
    Reverted,
    SubmissionFailed,
    Failed,
}

impl AccountState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AccountState::Skipped
                | AccountState::Confirmed
                | AccountState::Reverted
                | AccountState::SubmissionFailed
                | AccountState::Failed
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The oracle has no claimable record for the address.
    NotEligible,
    /// The address is a member of multisig accounts. Never claimed as a single signer,
    /// even when a single-signer balance exists too.
    MultisigUnsupported { memberships: Vec<String> },
}

impl SkipReason {
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::NotEligible => "NotEligible",
            SkipReason::MultisigUnsupported { .. } => "MultisigUnsupported",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MigrationOutcome {
    Skipped(SkipReason),
    Claimed { tx_hash: B256 },
    Failed(MigrationError),
}

impl MigrationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, MigrationOutcome::Failed(_))
    }

    /// Terminal state this outcome corresponds to.
    pub fn state(&self) -> AccountState {
        match self {
            MigrationOutcome::Skipped(_) => AccountState::Skipped,
            MigrationOutcome::Claimed { .. } => AccountState::Confirmed,
            MigrationOutcome::Failed(MigrationError::ConfirmedReverted { .. }) => {
                AccountState::Reverted
            }
            MigrationOutcome::Failed(
                MigrationError::SimulationReverted(_)
                | MigrationError::BroadcastFailed(_)
                | MigrationError::ConfirmationTimeout { .. },
            ) => AccountState::SubmissionFailed,
            MigrationOutcome::Failed(_) => AccountState::Failed,
        }
    }

    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            MigrationOutcome::Claimed { tx_hash } => Some(*tx_hash),
            MigrationOutcome::Failed(err) => err.tx_hash(),
            MigrationOutcome::Skipped(_) => None,
        }
    }
}

/// Terminal result for one input key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountReport {
    /// Position in the input batch, starting at 0.
    pub index: usize,
    /// `None` when the key could not be turned into an identity.
    pub source_address: Option<String>,
    pub public_key: Option<String>,
    pub outcome: MigrationOutcome,
}

#[derive(Clone, Debug)]
pub struct MigrationSummary {
    pub network: String,
    pub destination: Address,
    pub accounts: Vec<AccountReport>,
}

impl MigrationSummary {
    pub fn has_failures(&self) -> bool {
        self.accounts.iter().any(|a| a.outcome.is_failure())
    }

    pub fn count(&self, state: AccountState) -> usize {
        self.accounts
            .iter()
            .filter(|a| a.outcome.state() == state)
            .count()
    }
}

/// Runs the per-account claim flow over a batch of source keys.
pub struct Migrator<O, C> {
    network: String,
    oracle: O,
    contract: C,
    destination: Address,
    confirmation_timeout: Duration,
}

impl<O: EligibilityOracle, C: ClaimContract> Migrator<O, C> {
    pub fn new(
        network: impl Into<String>,
        oracle: O,
        contract: C,
        destination: Address,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            network: network.into(),
            oracle,
            contract,
            destination,
            confirmation_timeout,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Process every key in order. Never stops early.
    pub async fn run(&self, keys: &[SecretKeyText]) -> MigrationSummary {
        info!(
            network = %self.network,
            destination = %self.destination,
            accounts = keys.len(),
            "starting migration"
        );

        let mut accounts = Vec::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            let span = info_span!("account", index);
            let report = self.migrate_account(index, key).instrument(span).await;
            accounts.push(report);
        }

        let summary = MigrationSummary {
            network: self.network.clone(),
            destination: self.destination,
            accounts,
        };
        info!(
            claimed = summary.count(AccountState::Confirmed),
            skipped = summary.count(AccountState::Skipped),
            failed = summary.accounts.len()
                - summary.count(AccountState::Confirmed)
                - summary.count(AccountState::Skipped),
            "migration finished"
        );
        summary
    }

    pub async fn migrate_account(&self, index: usize, key: &SecretKeyText) -> AccountReport {
        debug!(state = ?AccountState::Pending);

        let identity = match parse_private_key(key.expose()).and_then(|raw| derive_identity(&raw)) {
            Ok(identity) => identity,
            Err(e) => {
                let outcome = MigrationOutcome::Failed(MigrationError::InvalidKey(e));
                log_outcome(None, &outcome);
                return AccountReport {
                    index,
                    source_address: None,
                    public_key: None,
                    outcome,
                };
            }
        };
        debug!(
            state = ?AccountState::IdentityDerived,
            source_address = identity.source_address()
        );
        info!(
            "migrating {} to {}",
            identity.source_address(),
            self.destination
        );

        let outcome = self
            .claim(&identity)
            .await
            .unwrap_or_else(MigrationOutcome::Failed);
        log_outcome(Some(identity.source_address()), &outcome);

        AccountReport {
            index,
            source_address: Some(identity.source_address().to_string()),
            public_key: Some(identity.public_key_hex()),
            outcome,
        }
    }

    async fn claim(&self, identity: &AccountIdentity) -> Result<MigrationOutcome, MigrationError> {
        let eligibility = self
            .oracle
            .check_eligibility(identity.source_address())
            .await?;
        debug!(
            state = ?AccountState::EligibilityChecked,
            eligible = eligibility.is_eligible,
            multisig_memberships = eligibility.multisig_memberships.len()
        );

        if eligibility.has_multisig_memberships() {
            let memberships: Vec<String> = eligibility
                .multisig_memberships
                .iter()
                .map(|m| m.lsk_address.clone())
                .collect();
            warn!(
                source_address = identity.source_address(),
                ?memberships,
                single_signer_balance = eligibility.balance,
                "account is a member of multisig accounts; multisig migration is not supported, skipping"
            );
            return Ok(MigrationOutcome::Skipped(SkipReason::MultisigUnsupported {
                memberships,
            }));
        }

        if !eligibility.is_eligible {
            return Ok(MigrationOutcome::Skipped(SkipReason::NotEligible));
        }

        info!(
            balance_beddows = eligibility.balance,
            signing_hash = %eligibility.signing_hash,
            "eligible"
        );

        let tx_hash = submit_claim(
            &self.contract,
            self.destination,
            &eligibility,
            identity,
            self.confirmation_timeout,
        )
        .await?;
        Ok(MigrationOutcome::Claimed { tx_hash })
    }
}

fn log_outcome(source_address: Option<&str>, outcome: &MigrationOutcome) {
    let state = outcome.state();
    match outcome {
        MigrationOutcome::Claimed { tx_hash } => {
            info!(?state, ?source_address, %tx_hash, "transaction confirmed")
        }
        MigrationOutcome::Skipped(reason) => {
            info!(?state, ?source_address, reason = reason.kind(), "skipped")
        }
        MigrationOutcome::Failed(err) => {
            error!(?state, ?source_address, kind = err.kind(), error = %err, "failed")
        }
    }
}
