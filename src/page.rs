//! View model for the claim page.

use ethers_core::types::U256;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

use crate::amount::{serialize_optional_decimal, SignedAmount};
use crate::claim::{derive_claim_state, ClaimState};
use crate::conditions::{ClaimSnapshot, ContractMetadata};

/// Bounds of the quantity input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuantityBounds {
    pub min: u64,
    /// `None` when the claimable headroom is negative.
    #[serde(serialize_with = "serialize_optional_decimal")]
    pub max: Option<U256>,
}

impl QuantityBounds {
    pub fn new(max_claimable: &SignedAmount) -> Self {
        Self {
            min: 1,
            max: max_claimable.as_bound(),
        }
    }
}

/// Keep a user-entered quantity within `[1, max_claimable]`.
///
/// Returns 1 when `max_claimable` is below 1.
pub fn clamp_quantity(requested: u64, max_claimable: &SignedAmount) -> u64 {
    let requested = requested.max(1);
    match max_claimable.as_bound() {
        Some(max) if max >= U256::one() => {
            if U256::from(requested) > max {
                // `max` is below `requested`, so it fits in a u64.
                max.as_u64()
            } else {
                requested
            }
        }
        _ => 1,
    }
}

/// Everything the rendering layer needs to draw the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPage {
    pub title: String,
    pub description: String,
    pub quantity: u64,
    pub state: ClaimState,
    pub phases: Vec<String>,
    pub reasons: Vec<String>,
    pub quantity_bounds: QuantityBounds,
}

impl ClaimPage {
    pub fn new(
        metadata: &ContractMetadata,
        snapshot: &ClaimSnapshot,
        quantity: u64,
        state: ClaimState,
    ) -> Self {
        Self {
            title: metadata.name.clone().unwrap_or_default(),
            description: metadata.description.clone().unwrap_or_default(),
            quantity,
            quantity_bounds: QuantityBounds::new(&state.max_claimable),
            phases: snapshot.phase_names().map(str::to_string).collect(),
            reasons: snapshot
                .ineligibility_reasons
                .iter()
                .map(|reason| reason.message().to_string())
                .collect(),
            state,
        }
    }

    /// Derive the state and build the page in one go.
    pub fn build(metadata: &ContractMetadata, snapshot: &ClaimSnapshot, quantity: u64) -> Self {
        Self::new(metadata, snapshot, quantity, derive_claim_state(snapshot, quantity))
    }

    /// Whether the claim control is enabled.
    pub fn claim_enabled(&self) -> bool {
        self.state.is_eligible
    }
}

impl Display for ClaimPage {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.title.is_empty() {
            writeln!(f, "{}", self.title)?;
        }
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
        }
        writeln!(f, "Claimable Supply: {}", self.state.supply_label())?;
        writeln!(f, "Claim Conditions: {}", self.phases.iter().join(", "))?;
        if !self.reasons.is_empty() {
            writeln!(f, "Claim Ineligibility Reasons:")?;
            for reason in &self.reasons {
                writeln!(f, "  - {reason}")?;
            }
        }
        match self.quantity_bounds.max {
            Some(max) => writeln!(
                f,
                "Quantity: {} (min {}, max {max})",
                self.quantity, self.quantity_bounds.min
            )?,
            None => writeln!(f, "Quantity: {} (none claimable)", self.quantity)?,
        }
        writeln!(
            f,
            "Price to mint: {}",
            self.state.price_label.as_deref().unwrap_or("-")
        )?;
        write!(
            f,
            "Claim: {}",
            if self.claim_enabled() { "enabled" } else { "disabled" }
        )
    }
}
