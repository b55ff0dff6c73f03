//! Raw claim-condition data, as handed over by the data-fetching layer.
//!
//! Every numeric field is optional and unparsed. Interpretation, including fallbacks for missing
//! or unreadable values, happens in [`crate::claim`].

mod reasons;

pub use reasons::IneligibilityReason;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::amount::RawAmount;

/// Denomination of the price of one claimed unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrencyMetadata {
    /// Price of a single unit, in base units of the currency.
    pub value: Option<RawAmount>,

    /// Number of decimals used to display `value`.
    pub decimals: Option<RawAmount>,

    pub symbol: Option<String>,
}

/// One phase of a claim schedule, e.g. an allowlist phase followed by a public phase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimCondition {
    pub name: String,

    /// Units still available to claim in this phase.
    pub available_supply: Option<RawAmount>,

    /// Upper bound on the units claimable in this phase.
    pub max_claimable_supply: Option<RawAmount>,

    /// Upper bound on the units a single wallet may claim.
    ///
    /// Not guaranteed to be below `max_claimable_supply`.
    pub max_claimable_per_wallet: Option<RawAmount>,

    pub currency_metadata: Option<CurrencyMetadata>,

    /// Supply reserved for allowlisted wallets in this phase.
    pub snapshot_cap: Option<RawAmount>,
}

/// The condition in effect for one particular wallet.
pub type ActiveClaimCondition = ClaimCondition;

/// Descriptive information about the drop contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Chain data feeding a single derivation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimSnapshot {
    /// May be [`None`] if no condition is active for the wallet.
    pub active_claim_condition: Option<ActiveClaimCondition>,

    /// All phases of the schedule, in order.
    pub claim_conditions: Vec<ClaimCondition>,

    /// Units claimed so far across all wallets.
    pub claimed_supply: Option<RawAmount>,

    pub ineligibility_reasons: BTreeSet<IneligibilityReason>,
}

impl ClaimSnapshot {
    pub fn phase_names(&self) -> impl Iterator<Item = &str> {
        self.claim_conditions.iter().map(|cc| cc.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::U256;

    #[test]
    fn test_snapshot_from_camel_case_json() {
        let snapshot: ClaimSnapshot = serde_json::from_str(
            r#"{
                "activeClaimCondition": {
                    "name": "Public",
                    "availableSupply": "500",
                    "maxClaimableSupply": "unlimited",
                    "maxClaimablePerWallet": 5,
                    "currencyMetadata": {"value": "10000000000000000", "decimals": 18, "symbol": "ETH"}
                },
                "claimConditions": [
                    {"name": "Allowlist", "snapshotCap": 3},
                    {"name": "Public", "snapshotCap": null}
                ],
                "claimedSupply": {"type": "BigNumber", "hex": "0x01f4"},
                "ineligibilityReasons": ["NOT_ENOUGH_SUPPLY", "NOT_ENOUGH_SUPPLY"]
            }"#,
        )
        .unwrap();

        let active = snapshot.active_claim_condition.as_ref().unwrap();
        assert_eq!(active.name, "Public");
        assert_eq!(active.available_supply.as_ref().unwrap().parse(), Ok(U256::from(500)));
        assert!(active.max_claimable_supply.as_ref().unwrap().parse().is_err());
        assert_eq!(snapshot.claim_conditions[1].snapshot_cap, None);
        assert_eq!(snapshot.claimed_supply.unwrap().parse(), Ok(U256::from(500)));
        assert_eq!(snapshot.ineligibility_reasons.len(), 1);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot: ClaimSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, ClaimSnapshot::default());

        let cc: ClaimCondition = serde_json::from_str(r#"{"currencyMetadata": {}}"#).unwrap();
        assert_eq!(cc.name, "");
        assert_eq!(cc.currency_metadata, Some(CurrencyMetadata::default()));
    }

    #[test]
    fn test_phase_names_keep_order() {
        let snapshot = ClaimSnapshot {
            claim_conditions: vec![
                ClaimCondition { name: "Allowlist".into(), ..Default::default() },
                ClaimCondition { name: "Public".into(), ..Default::default() },
            ],
            ..Default::default()
        };
        assert_eq!(snapshot.phase_names().collect::<Vec<_>>(), vec!["Allowlist", "Public"]);
    }
}
