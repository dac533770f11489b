//! Types shared by the claim encoder and the migrator.
//!
//! Everything here is plain data: no I/O, no key material.

pub mod claim;
pub mod eligibility;

pub use claim::{ClaimArgs, SignatureParts, CLAIM_REGULAR_ACCOUNT};
pub use eligibility::{EligibilityRecord, MultisigMembership};
