//! Upstream claim data.
//!
//! A [`ClaimDataSource`] answers the queries a claim page depends on. [`collect_snapshot`] runs
//! all of them and turns every failure into an absent value, so a broken query shows up as a
//! fallback in the derived state rather than as an error.

use ethers_core::types::Address;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::amount::RawAmount;
use crate::conditions::{
    ActiveClaimCondition, ClaimCondition, ClaimSnapshot, ContractMetadata, IneligibilityReason,
};
use crate::error::SourceError;

/// Queries answered by the chain client for one token drop contract.
#[cfg_attr(test, mockall::automock)]
pub trait ClaimDataSource {
    fn contract_metadata(&self, contract: Address) -> Result<ContractMetadata, SourceError>;

    /// All phases of the claim schedule, in order.
    fn claim_conditions(&self, contract: Address) -> Result<Vec<ClaimCondition>, SourceError>;

    /// The phase in effect for `wallet`, if any.
    fn active_claim_condition(
        &self,
        contract: Address,
        wallet: Option<Address>,
    ) -> Result<Option<ActiveClaimCondition>, SourceError>;

    /// Units claimed so far across all wallets.
    fn claimed_supply(&self, contract: Address) -> Result<Option<RawAmount>, SourceError>;

    /// Rules preventing `wallet` from claiming `quantity` units.
    fn ineligibility_reasons(
        &self,
        contract: Address,
        wallet: Option<Address>,
        quantity: u64,
    ) -> Result<BTreeSet<IneligibilityReason>, SourceError>;
}

/// Inputs of one page render, as collected from a [`ClaimDataSource`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimData {
    pub metadata: ContractMetadata,
    pub snapshot: ClaimSnapshot,
}

/// Run every query for `contract`, substituting the absent value for each one that fails.
pub fn collect_snapshot<S: ClaimDataSource + ?Sized>(
    source: &S,
    contract: Address,
    wallet: Option<Address>,
    quantity: u64,
) -> ClaimData {
    let metadata = source
        .contract_metadata(contract)
        .unwrap_or_else(|err| absent("contract metadata", err));
    let claim_conditions = source
        .claim_conditions(contract)
        .unwrap_or_else(|err| absent("claim conditions", err));
    let active_claim_condition = source
        .active_claim_condition(contract, wallet)
        .unwrap_or_else(|err| absent("active claim condition", err));
    let claimed_supply = source
        .claimed_supply(contract)
        .unwrap_or_else(|err| absent("claimed supply", err));
    let ineligibility_reasons = source
        .ineligibility_reasons(contract, wallet, quantity)
        .unwrap_or_else(|err| absent("ineligibility reasons", err));

    debug!(
        "collected {} claim conditions for {contract:?} (active: {})",
        claim_conditions.len(),
        active_claim_condition.is_some()
    );

    ClaimData {
        metadata,
        snapshot: ClaimSnapshot {
            active_claim_condition,
            claim_conditions,
            claimed_supply,
            ineligibility_reasons,
        },
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn absent<T: Default>(what: &str, err: SourceError) -> T {
    warn!("failed to fetch {what}, treating as absent: {err}");
    T::default()
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContractEntry {
    metadata: ContractMetadata,
    claim_conditions: Vec<ClaimCondition>,
    active_claim_condition: Option<ActiveClaimCondition>,
    claimed_supply: Option<RawAmount>,
    ineligibility_reasons: BTreeSet<IneligibilityReason>,
    wallets: HashMap<String, WalletEntry>,
}

/// Per-wallet overrides. Fields that are present replace the contract-level ones.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WalletEntry {
    active_claim_condition: Option<ActiveClaimCondition>,
    ineligibility_reasons: Option<BTreeSet<IneligibilityReason>>,
}

/// Claim data read from a JSON document keyed by contract address.
///
/// ```json
/// {
///   "0x8494E2E992a0669B86174d79B98750F7827bA4F3": {
///     "metadata": { "name": "Drop" },
///     "claimConditions": [ { "name": "Public", "maxClaimablePerWallet": 5 } ],
///     "activeClaimCondition": { "name": "Public", "maxClaimablePerWallet": 5 },
///     "claimedSupply": "10",
///     "ineligibilityReasons": [],
///     "wallets": { "0x...": { "ineligibilityReasons": ["ALREADY_CLAIMED"] } }
///   }
/// }
/// ```
///
/// Addresses are matched case-insensitively. The requested quantity does not affect the
/// recorded reasons.
#[derive(Clone, Debug, Default)]
pub struct JsonFileSource {
    path: Option<PathBuf>,
    contracts: HashMap<Address, ContractEntry>,
}

impl JsonFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| io_error(path, err))?;
        Self::from_file_contents(path, &json)
    }

    /// Like [`JsonFileSource::open`], without blocking the runtime while the file is read.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| io_error(path, err))?;
        Self::from_file_contents(path, &json)
    }

    fn from_file_contents(path: &Path, json: &str) -> Result<Self, SourceError> {
        let mut source = Self::from_json(json)?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let raw: HashMap<String, ContractEntry> = serde_json::from_str(json)?;
        let contracts = raw
            .into_iter()
            .filter_map(|(key, entry)| match key.parse::<Address>() {
                Ok(address) => Some((address, entry)),
                Err(err) => {
                    warn!("skipping claim data under invalid contract address {key:?}: {err}");
                    None
                }
            })
            .collect();
        Ok(Self {
            path: None,
            contracts,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn entry(&self, contract: Address) -> Result<&ContractEntry, SourceError> {
        self.contracts
            .get(&contract)
            .ok_or(SourceError::UnknownContract(contract))
    }

    fn wallet_entry(
        &self,
        contract: Address,
        wallet: Address,
    ) -> Result<Option<&WalletEntry>, SourceError> {
        Ok(self
            .entry(contract)?
            .wallets
            .iter()
            .find(|(key, _)| key.parse::<Address>().map_or(false, |addr| addr == wallet))
            .map(|(_, entry)| entry))
    }
}

impl ClaimDataSource for JsonFileSource {
    fn contract_metadata(&self, contract: Address) -> Result<ContractMetadata, SourceError> {
        Ok(self.entry(contract)?.metadata.clone())
    }

    fn claim_conditions(&self, contract: Address) -> Result<Vec<ClaimCondition>, SourceError> {
        Ok(self.entry(contract)?.claim_conditions.clone())
    }

    fn active_claim_condition(
        &self,
        contract: Address,
        wallet: Option<Address>,
    ) -> Result<Option<ActiveClaimCondition>, SourceError> {
        if let Some(wallet) = wallet {
            if let Some(cc) = self
                .wallet_entry(contract, wallet)?
                .and_then(|entry| entry.active_claim_condition.as_ref())
            {
                return Ok(Some(cc.clone()));
            }
        }
        Ok(self.entry(contract)?.active_claim_condition.clone())
    }

    fn claimed_supply(&self, contract: Address) -> Result<Option<RawAmount>, SourceError> {
        Ok(self.entry(contract)?.claimed_supply.clone())
    }

    fn ineligibility_reasons(
        &self,
        contract: Address,
        wallet: Option<Address>,
        _quantity: u64,
    ) -> Result<BTreeSet<IneligibilityReason>, SourceError> {
        let Some(wallet) = wallet else {
            return Ok([IneligibilityReason::NoWallet].into_iter().collect());
        };
        if let Some(reasons) = self
            .wallet_entry(contract, wallet)?
            .and_then(|entry| entry.ineligibility_reasons.as_ref())
        {
            return Ok(reasons.clone());
        }
        Ok(self.entry(contract)?.ineligibility_reasons.clone())
    }
}
