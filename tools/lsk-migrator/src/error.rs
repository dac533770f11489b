use alloy_primitives::B256;
use lsk_claim_encoder::IdentityError;
use thiserror::Error;

/// Per-account failures. The driver turns every one of these into that
/// account's outcome; none of them stop the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("invalid private key: {0}")]
    InvalidKey(#[from] IdentityError),

    #[error("eligibility oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("eligibility oracle protocol error: {0}")]
    OracleProtocolError(String),

    #[error("claim simulation reverted: {0}")]
    SimulationReverted(String),

    #[error("failed to broadcast claim transaction: {0}")]
    BroadcastFailed(String),

    /// Sent, but finality was not observed. The transaction may still land.
    #[error("transaction {tx_hash} not confirmed: {reason}")]
    ConfirmationTimeout { tx_hash: B256, reason: String },

    #[error("transaction {tx_hash} was mined but reverted")]
    ConfirmedReverted { tx_hash: B256 },
}

impl MigrationError {
    /// Stable name used in logs and the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            MigrationError::InvalidKey(_) => "InvalidKey",
            MigrationError::OracleUnavailable(_) => "OracleUnavailable",
            MigrationError::OracleProtocolError(_) => "OracleProtocolError",
            MigrationError::SimulationReverted(_) => "SimulationReverted",
            MigrationError::BroadcastFailed(_) => "BroadcastFailed",
            MigrationError::ConfirmationTimeout { .. } => "ConfirmationTimeout",
            MigrationError::ConfirmedReverted { .. } => "ConfirmedReverted",
        }
    }

    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            MigrationError::ConfirmationTimeout { tx_hash, .. }
            | MigrationError::ConfirmedReverted { tx_hash } => Some(*tx_hash),
            _ => None,
        }
    }
}
