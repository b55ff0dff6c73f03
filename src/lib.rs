pub mod amount;
pub mod claim;       // Derivation of supply figures, price and eligibility
pub mod conditions;
pub mod config;
pub mod constants;
pub mod error;
pub mod page;
pub mod source;      // Upstream claim data
pub mod utils;
pub mod watch;

pub use claim::{derive_claim_state, ClaimState};
pub use conditions::{ClaimCondition, ClaimSnapshot, IneligibilityReason};
