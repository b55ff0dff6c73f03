use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A rule currently blocking a wallet from claiming.
///
/// Reported by the eligibility check as an opaque code. Codes this crate does not know are kept
/// verbatim in [`IneligibilityReason::Other`] and still block the claim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum IneligibilityReason {
    NotEnoughSupply,
    AddressNotAllowed,
    WaitBeforeNextClaimTransaction,
    AlreadyClaimed,
    NotEnoughTokens,
    NoActiveClaimPhase,
    NoClaimConditionSet,
    NoWallet,
    Unknown,
    Other(String),
}

impl IneligibilityReason {
    pub fn code(&self) -> &str {
        match self {
            Self::NotEnoughSupply => "NOT_ENOUGH_SUPPLY",
            Self::AddressNotAllowed => "ADDRESS_NOT_ALLOWED",
            Self::WaitBeforeNextClaimTransaction => "WAIT_BEFORE_NEXT_CLAIM_TRANSACTION",
            Self::AlreadyClaimed => "ALREADY_CLAIMED",
            Self::NotEnoughTokens => "NOT_ENOUGH_TOKENS",
            Self::NoActiveClaimPhase => "NO_ACTIVE_CLAIM_PHASE",
            Self::NoClaimConditionSet => "NO_CLAIM_CONDITION_SET",
            Self::NoWallet => "NO_WALLET",
            Self::Unknown => "UNKNOWN",
            Self::Other(code) => code,
        }
    }

    /// Text shown to the user in place of the code.
    pub fn message(&self) -> &str {
        match self {
            Self::NotEnoughSupply => "There is not enough supply to claim.",
            Self::AddressNotAllowed => "This address is not on the allowlist.",
            Self::WaitBeforeNextClaimTransaction => {
                "Not enough time since last claim transaction. Please wait."
            }
            Self::AlreadyClaimed => "You have already claimed the token.",
            Self::NotEnoughTokens => {
                "There are not enough tokens in the wallet to pay for the claim."
            }
            Self::NoActiveClaimPhase => {
                "There is no active claim phase at the moment. Please check back in later."
            }
            Self::NoClaimConditionSet => "There is no claim condition set.",
            Self::NoWallet => "No wallet connected.",
            Self::Unknown => "No claim conditions found.",
            Self::Other(code) => code,
        }
    }
}

/// Accepts `NOT_ENOUGH_SUPPLY`, `not-enough-supply`, `NotEnoughSupply` and similar spellings.
fn normalize_code(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.trim().chars() {
        if matches!(c, '-' | ' ' | '_') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }
    out
}

impl FromStr for IneligibilityReason {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize_code(s).as_str() {
            "NOT_ENOUGH_SUPPLY" => Self::NotEnoughSupply,
            "ADDRESS_NOT_ALLOWED" => Self::AddressNotAllowed,
            "WAIT_BEFORE_NEXT_CLAIM_TRANSACTION" => Self::WaitBeforeNextClaimTransaction,
            "ALREADY_CLAIMED" => Self::AlreadyClaimed,
            "NOT_ENOUGH_TOKENS" => Self::NotEnoughTokens,
            "NO_ACTIVE_CLAIM_PHASE" => Self::NoActiveClaimPhase,
            "NO_CLAIM_CONDITION_SET" => Self::NoClaimConditionSet,
            "NO_WALLET" => Self::NoWallet,
            "UNKNOWN" => Self::Unknown,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for IneligibilityReason {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(reason) => reason,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for IneligibilityReason {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<IneligibilityReason> for String {
    fn from(value: IneligibilityReason) -> Self {
        value.code().to_string()
    }
}

impl Display for IneligibilityReason {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}
