//! Off-chain half of the Lisk token claim: who is claiming, and what they sign.

pub mod encoder;
pub mod errors;
pub mod identity;
pub mod lisk32;


pub use encoder::{claim_message, prepare_claim, ClaimMessage, CLAIM_MESSAGE_LEN};
pub use errors::IdentityError;
pub use identity::{derive_identity, parse_private_key, sign, verify, AccountIdentity};
