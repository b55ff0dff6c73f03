use ethers_core::types::U256;

/// Crate name used to scope the log filter.
pub static PROJECT_NAME: &str = "claim_drop";

/// Token drop contract the page is bound to unless overridden at startup.
pub static DEFAULT_TOKEN_ADDRESS: &str = "0x8494E2E992a0669B86174d79B98750F7827bA4F3";

/// Stand-in for "no limit" when a supply or cap field is missing or unreadable.
///
/// Totals at or above this value are never displayed.
pub const UNBOUNDED_SUPPLY: u64 = 1_000_000_000;

/// Decimals assumed for a price whose currency metadata is missing.
pub const DEFAULT_CURRENCY_DECIMALS: u8 = 18;

pub fn unbounded_supply() -> U256 {
    U256::from(UNBOUNDED_SUPPLY)
}
