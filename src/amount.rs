use ethers_core::types::{U256, U512};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::error::AmountError;

/// An integer-like field exactly as the data layer delivered it.
///
/// Chain clients hand amounts over as JSON numbers, decimal strings, hex strings or serialized
/// BigNumber objects, and occasionally as words like `"unlimited"`. Nothing is interpreted until
/// [`RawAmount::parse`] is called.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawAmount(Value);

impl RawAmount {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Read the field as a non-negative 256-bit integer.
    pub fn parse(&self) -> Result<U256, AmountError> {
        match &self.0 {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(U256::from(v))
                } else if n.as_i64().is_some() || n.as_f64().map_or(false, |f| f < 0.0) {
                    Err(AmountError::Negative(n.to_string()))
                } else {
                    Err(AmountError::NotInteger(n.to_string()))
                }
            }
            Value::String(s) => parse_integer_str(s),
            Value::Object(fields) => match fields.get("hex").or_else(|| fields.get("_hex")) {
                Some(Value::String(hex)) if hex.trim().starts_with("0x") => parse_integer_str(hex),
                _ => Err(AmountError::Unsupported(self.0.to_string())),
            },
            other => Err(AmountError::Unsupported(other.to_string())),
        }
    }
}

impl From<u64> for RawAmount {
    fn from(value: u64) -> Self {
        Self(Value::from(value))
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<U256> for RawAmount {
    fn from(value: U256) -> Self {
        Self(Value::String(value.to_string()))
    }
}

fn parse_integer_str(raw: &str) -> Result<U256, AmountError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }
    if s.starts_with('-') {
        return Err(AmountError::Negative(s.to_string()));
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() {
            return Err(AmountError::Empty);
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AmountError::NotInteger(s.to_string()));
        }
        if hex.trim_start_matches('0').len() > 64 {
            return Err(AmountError::Overflow(s.to_string()));
        }
        return U256::from_str_radix(hex, 16).map_err(|_| AmountError::Overflow(s.to_string()));
    }

    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::NotInteger(s.to_string()));
    }
    U256::from_dec_str(s).map_err(|_| AmountError::Overflow(s.to_string()))
}

/// A signed quantity with a 256-bit magnitude.
///
/// Claim headroom can go below zero once allowlist reservations are taken out of a cap, and the
/// sign matters to eligibility, so it is kept rather than clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignedAmount {
    NonNegative(U256),
    /// Magnitude of a strictly negative value. Never zero.
    Negative(U256),
}

impl SignedAmount {
    /// `a - b`, exact.
    pub fn difference(a: U256, b: U256) -> Self {
        if a >= b {
            Self::NonNegative(a - b)
        } else {
            Self::Negative(b - a)
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Negative(_))
    }

    /// The value as an upper bound, or `None` when it is negative.
    pub fn as_bound(&self) -> Option<U256> {
        match self {
            Self::NonNegative(v) => Some(*v),
            Self::Negative(_) => None,
        }
    }

    /// Whether `quantity <= self`.
    pub fn covers(&self, quantity: u64) -> bool {
        match self {
            Self::NonNegative(v) => U256::from(quantity) <= *v,
            Self::Negative(_) => false,
        }
    }
}

impl From<U256> for SignedAmount {
    fn from(value: U256) -> Self {
        Self::NonNegative(value)
    }
}

impl Ord for SignedAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::NonNegative(a), Self::NonNegative(b)) => a.cmp(b),
            (Self::Negative(a), Self::Negative(b)) => b.cmp(a),
            (Self::Negative(_), Self::NonNegative(_)) => Ordering::Less,
            (Self::NonNegative(_), Self::Negative(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SignedAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for SignedAmount {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::NonNegative(v) => write!(f, "{v}"),
            Self::Negative(v) => write!(f, "-{v}"),
        }
    }
}

impl Serialize for SignedAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Serialize an amount as a base-10 string instead of the default hex encoding.
pub fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn serialize_optional_decimal<S: Serializer>(
    value: &Option<U256>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_none(),
    }
}

/// Render an integer amount of base units as a fixed-point decimal string.
///
/// Trailing fractional zeros are dropped but at least one fractional digit is kept, so
/// `6 * 10^18` at 18 decimals is `"6.0"`. With zero decimals no point is printed.
pub fn format_units(value: impl Into<U512>, decimals: u8) -> String {
    let digits = value.into().to_string();
    if decimals == 0 {
        return digits;
    }

    let decimals = decimals as usize;
    let (whole, fraction) = if digits.len() > decimals {
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        (whole.to_string(), fraction.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };

    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{whole}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawAmount {
        RawAmount::new(value)
    }

    #[test]
    fn test_parse_accepted_encodings() {
        assert_eq!(raw(json!(500)).parse(), Ok(U256::from(500)));
        assert_eq!(raw(json!("  1000 ")).parse(), Ok(U256::from(1000)));
        assert_eq!(raw(json!("0x3e8")).parse(), Ok(U256::from(1000)));
        assert_eq!(
            raw(json!({"type": "BigNumber", "hex": "0x0de0b6b3a7640000"})).parse(),
            Ok(U256::exp10(18))
        );
        assert_eq!(raw(json!({"_hex": "0x05", "_isBigNumber": true})).parse(), Ok(U256::from(5)));
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        assert_eq!(raw(json!("")).parse(), Err(AmountError::Empty));
        assert_eq!(raw(json!("0x")).parse(), Err(AmountError::Empty));
        assert!(matches!(raw(json!(-3)).parse(), Err(AmountError::Negative(_))));
        assert!(matches!(raw(json!("-3")).parse(), Err(AmountError::Negative(_))));
        assert!(matches!(raw(json!(1.5)).parse(), Err(AmountError::NotInteger(_))));
        assert!(matches!(raw(json!("unlimited")).parse(), Err(AmountError::NotInteger(_))));
        assert!(matches!(raw(json!("1_000")).parse(), Err(AmountError::NotInteger(_))));
        assert!(matches!(raw(json!(true)).parse(), Err(AmountError::Unsupported(_))));
        assert!(matches!(raw(json!([1])).parse(), Err(AmountError::Unsupported(_))));
    }

    #[test]
    fn test_parse_overflow() {
        let too_big = format!("1{}", "0".repeat(78));
        assert!(matches!(raw(json!(too_big)).parse(), Err(AmountError::Overflow(_))));

        let max_hex = format!("0x{}", "f".repeat(64));
        assert_eq!(raw(json!(max_hex)).parse(), Ok(U256::MAX));
        let too_long_hex = format!("0x1{}", "0".repeat(64));
        assert!(matches!(raw(json!(too_long_hex)).parse(), Err(AmountError::Overflow(_))));
    }

    #[test]
    fn test_signed_difference() {
        let five = U256::from(5);
        let three = U256::from(3);
        assert_eq!(SignedAmount::difference(five, three), SignedAmount::NonNegative(U256::from(2)));
        assert_eq!(SignedAmount::difference(three, five), SignedAmount::Negative(U256::from(2)));
        assert_eq!(SignedAmount::difference(five, five), SignedAmount::NonNegative(U256::zero()));
        assert_eq!(SignedAmount::difference(three, five).to_string(), "-2");
        assert_eq!(SignedAmount::difference(U256::zero(), U256::MAX).as_bound(), None);
    }

    #[test]
    fn test_signed_ordering_and_cover() {
        let minus_two = SignedAmount::Negative(U256::from(2));
        let minus_one = SignedAmount::Negative(U256::from(1));
        let zero = SignedAmount::NonNegative(U256::zero());
        let two = SignedAmount::NonNegative(U256::from(2));
        assert!(minus_two < minus_one);
        assert!(minus_one < zero);
        assert!(zero < two);

        assert!(two.covers(2));
        assert!(!two.covers(3));
        assert!(zero.covers(0));
        assert!(!minus_one.covers(0));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(6) * U256::exp10(18), 18), "6.0");
        assert_eq!(format_units(U256::from(15) * U256::exp10(17), 18), "1.5");
        assert_eq!(format_units(U256::one(), 18), "0.000000000000000001");
        assert_eq!(format_units(U256::zero(), 18), "0.0");
        assert_eq!(format_units(U256::from(1234), 2), "12.34");
        assert_eq!(format_units(U256::from(6), 0), "6");
    }

    #[test]
    fn test_format_units_wide_values() {
        let wide = U256::MAX.full_mul(U256::from(3));
        let formatted = format_units(wide, 255);
        assert!(formatted.starts_with("0.000"));
        assert!(!formatted.ends_with('0'));
    }
}
