//! Derivation of the UI-ready claim state from a raw snapshot.
//!
//! Chain data arrives partial and loosely typed. [`derive_claim_state`] never fails on it: any
//! supply or cap that is missing or unreadable is read as [`UNBOUNDED_SUPPLY`], any missing
//! count or price as zero.

use ethers_core::types::U256;
use log::debug;
use serde::Serialize;

use crate::amount::{format_units, serialize_decimal, RawAmount, SignedAmount};
use crate::conditions::{ClaimCondition, ClaimSnapshot};
use crate::constants::{unbounded_supply, DEFAULT_CURRENCY_DECIMALS, UNBOUNDED_SUPPLY};

/// What the claim page shows and gates on, for one snapshot and one requested quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimState {
    /// Units claimed so far.
    #[serde(serialize_with = "serialize_decimal")]
    pub claimed_count: U256,

    /// Total supply as text, or empty when the supply is unbounded or unknown.
    pub total_supply_display: String,

    /// Units the wallet may still claim.
    ///
    /// Negative when allowlist reservations exceed the cap. Check the sign before using this as a
    /// display bound.
    pub max_claimable: SignedAmount,

    /// Price of the requested quantity with its currency symbol, if a quantity is requested.
    pub price_label: Option<String>,

    pub is_eligible: bool,
}

impl ClaimState {
    /// `claimed/total`, as shown on the supply card.
    pub fn supply_label(&self) -> String {
        format!("{}/{}", self.claimed_count, self.total_supply_display)
    }
}

/// Derive the claim state for `requested_quantity` units.
pub fn derive_claim_state(snapshot: &ClaimSnapshot, requested_quantity: u64) -> ClaimState {
    let active = snapshot.active_claim_condition.as_ref();

    let claimed_count = claimed_count(snapshot.claimed_supply.as_ref());
    let available =
        amount_or_unbounded(active.and_then(|cc| cc.available_supply.as_ref()), "availableSupply");
    let max_claimable = max_claimable(active, &snapshot.claim_conditions);
    let is_eligible =
        snapshot.ineligibility_reasons.is_empty() && max_claimable.covers(requested_quantity);

    ClaimState {
        claimed_count,
        total_supply_display: total_supply_display(available, claimed_count),
        max_claimable,
        price_label: price_label(active, requested_quantity),
        is_eligible,
    }
}

fn amount_or_unbounded(field: Option<&RawAmount>, name: &str) -> U256 {
    match field.map(RawAmount::parse) {
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            debug!("{name} unreadable ({err}), treating as unbounded");
            unbounded_supply()
        }
        None => {
            debug!("{name} missing, treating as unbounded");
            unbounded_supply()
        }
    }
}

fn amount_or_zero(field: Option<&RawAmount>, name: &str) -> U256 {
    match field.map(RawAmount::parse) {
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            debug!("{name} unreadable ({err}), treating as zero");
            U256::zero()
        }
        None => U256::zero(),
    }
}

fn claimed_count(claimed_supply: Option<&RawAmount>) -> U256 {
    amount_or_zero(claimed_supply, "claimedSupply")
}

fn total_supply_display(available: U256, claimed: U256) -> String {
    // Saturating is exact here: anything that large is hidden anyway.
    let total = available.saturating_add(claimed);
    if total >= U256::from(UNBOUNDED_SUPPLY) {
        String::new()
    } else {
        total.to_string()
    }
}

/// The smaller of the supply and per-wallet caps, less the largest allowlist reservation of any
/// phase.
///
/// The reservation is taken across all phases, not just the active one.
fn max_claimable(active: Option<&ClaimCondition>, conditions: &[ClaimCondition]) -> SignedAmount {
    let mut cap = amount_or_unbounded(
        active.and_then(|cc| cc.max_claimable_supply.as_ref()),
        "maxClaimableSupply",
    );
    let per_wallet = amount_or_unbounded(
        active.and_then(|cc| cc.max_claimable_per_wallet.as_ref()),
        "maxClaimablePerWallet",
    );
    if per_wallet <= cap {
        cap = per_wallet;
    }

    let reserved = largest_snapshot_cap(conditions);
    if reserved.is_zero() {
        SignedAmount::from(cap)
    } else {
        SignedAmount::difference(cap, reserved)
    }
}

fn largest_snapshot_cap(conditions: &[ClaimCondition]) -> U256 {
    conditions
        .iter()
        .map(|cc| amount_or_zero(cc.snapshot_cap.as_ref(), "snapshotCap"))
        .max()
        .unwrap_or_default()
}

fn price_label(active: Option<&ClaimCondition>, quantity: u64) -> Option<String> {
    if quantity < 1 {
        return None;
    }

    let currency = active.and_then(|cc| cc.currency_metadata.as_ref());
    let unit_price = amount_or_zero(currency.and_then(|c| c.value.as_ref()), "currency value");
    let decimals = currency_decimals(currency.and_then(|c| c.decimals.as_ref()));
    let amount = format_units(unit_price.full_mul(U256::from(quantity)), decimals);

    Some(match currency.and_then(|c| c.symbol.as_deref()) {
        Some(symbol) if !symbol.is_empty() => format!("{amount} {symbol}"),
        _ => amount,
    })
}

fn currency_decimals(field: Option<&RawAmount>) -> u8 {
    let default = DEFAULT_CURRENCY_DECIMALS;
    match field.map(RawAmount::parse) {
        Some(Ok(decimals)) if decimals <= U256::from(u8::MAX) => decimals.as_u32() as u8,
        Some(Ok(decimals)) => {
            debug!("currency decimals {decimals} out of range, using {default}");
            default
        }
        Some(Err(err)) => {
            debug!("currency decimals unreadable ({err}), using {default}");
            default
        }
        None => default,
    }
}
