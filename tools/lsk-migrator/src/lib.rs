//! Lisk legacy account migration to the L2 claim contract.
//!
//! For every source key: derive the Lisk identity, ask the claim API what it
//! may claim, sign the claim message and submit it, one account at a time.

pub mod config;
pub mod contract;
pub mod driver;
pub mod error;
pub mod oracle;
pub mod report;
pub mod submitter;

pub use config::{NetworkConfig, SecretKeyText};
pub use driver::{AccountReport, AccountState, MigrationOutcome, MigrationSummary, Migrator, SkipReason};
pub use error::MigrationError;
pub use oracle::{EligibilityOracle, JsonRpcOracle};
pub use submitter::{submit_claim, submit_prepared, ClaimContract, ReceiptStatus};
