//! Claim submission: simulate, send, wait for one receipt.
//!
//! Each step is a single bounded wait. Nothing is retried here; an account
//! that fails is left for the operator to re-run.

use std::time::Duration;

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use lsk_claim_encoder::{prepare_claim, AccountIdentity};
use lsk_claim_types::{ClaimArgs, EligibilityRecord};
use tracing::{debug, info};

use crate::{driver::AccountState, error::MigrationError};

/// Execution status reported by the destination chain for a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// The destination claim contract, as seen from one funded sender.
#[async_trait]
pub trait ClaimContract: Send + Sync {
    /// Dry-run `claimRegularAccount`. `Err(SimulationReverted)` carries the revert reason.
    async fn simulate(&self, args: &ClaimArgs) -> Result<(), MigrationError>;

    /// Sign and broadcast the claim, returning its transaction hash.
    async fn broadcast(&self, args: &ClaimArgs) -> Result<B256, MigrationError>;

    /// Wait at most `timeout` for the transaction to be mined.
    async fn await_receipt(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<ReceiptStatus, MigrationError>;
}

/// Build, sign and submit the claim for one eligible account.
pub async fn submit_claim<C: ClaimContract + ?Sized>(
    contract: &C,
    recipient: Address,
    eligibility: &EligibilityRecord,
    identity: &AccountIdentity,
    confirmation_timeout: Duration,
) -> Result<B256, MigrationError> {
    let args = prepare_claim(recipient, eligibility, identity);
    debug!(
        state = ?AccountState::MessageSigned,
        r = %args.signature.r,
        s = %args.signature.s
    );
    submit_prepared(contract, &args, confirmation_timeout).await
}

/// Submit already signed claim arguments.
///
/// A failed simulation means nothing is sent.
pub async fn submit_prepared<C: ClaimContract + ?Sized>(
    contract: &C,
    args: &ClaimArgs,
    confirmation_timeout: Duration,
) -> Result<B256, MigrationError> {
    contract.simulate(args).await?;
    debug!(public_key = %args.public_key, "claim simulation passed");

    let tx_hash = contract.broadcast(args).await?;
    debug!(state = ?AccountState::Submitted, %tx_hash);
    info!(%tx_hash, "sent transaction, waiting for confirmation");

    match contract.await_receipt(tx_hash, confirmation_timeout).await? {
        ReceiptStatus::Success => Ok(tx_hash),
        ReceiptStatus::Reverted => Err(MigrationError::ConfirmedReverted { tx_hash }),
    }
}
