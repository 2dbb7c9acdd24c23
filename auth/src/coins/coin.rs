//! # Single-Denomination Coin
//!
//! A [`Coin`] is one `(denom, amount)` pair. Amounts are arbitrary-precision
//! unsigned integers: the ledger never divides with floats, and it never
//! wraps around at `u64::MAX`.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use super::CoinsError;
use crate::config::{MAX_DENOM_LENGTH, MIN_DENOM_LENGTH};

// ---------------------------------------------------------------------------
// Denomination rules
// ---------------------------------------------------------------------------

/// Checks a denomination against `[a-z][a-z0-9]{2,15}`.
///
/// # Errors
///
/// Returns [`CoinsError::InvalidDenom`] on any violation.
pub fn validate_denom(denom: &str) -> Result<(), CoinsError> {
    let mut chars = denom.chars();
    let length_ok = (MIN_DENOM_LENGTH..=MAX_DENOM_LENGTH).contains(&denom.len());
    let head_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let tail_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

    if length_ok && head_ok && tail_ok {
        Ok(())
    } else {
        Err(CoinsError::InvalidDenom(denom.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Coin
// ---------------------------------------------------------------------------

/// A quantity of a single denomination.
///
/// Zero amounts are representable here; [`Coins`](super::Coins) is the
/// type that elides them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoin")]
pub struct Coin {
    denom: String,
    #[serde(with = "amount_bytes")]
    amount: BigUint,
}

/// Wire shape of a [`Coin`] before the denomination is checked.
#[derive(Deserialize)]
struct RawCoin {
    denom: String,
    #[serde(with = "amount_bytes")]
    amount: BigUint,
}

impl TryFrom<RawCoin> for Coin {
    type Error = CoinsError;

    fn try_from(raw: RawCoin) -> Result<Self, Self::Error> {
        Coin::new(raw.denom, raw.amount)
    }
}

impl Coin {
    /// Creates a coin after validating the denomination.
    pub fn new(denom: impl Into<String>, amount: impl Into<BigUint>) -> Result<Self, CoinsError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self {
            denom,
            amount: amount.into(),
        })
    }

    pub fn denom(&self) -> &str {
        &self.denom
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }

    /// Returns `true` if this coin carries no value.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub(crate) fn from_parts(denom: String, amount: BigUint) -> Self {
        Self { denom, amount }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinsError;

    /// Parses `"<amount><denom>"`, e.g. `"123atom"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinsError::Parse(format!("missing denomination in '{}'", s)))?;
        let (digits, denom) = s.split_at(split);
        if digits.is_empty() {
            return Err(CoinsError::Parse(format!("missing amount in '{}'", s)));
        }
        let amount = BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| CoinsError::Parse(format!("invalid amount in '{}'", s)))?;
        Coin::new(denom, amount)
    }
}

// ---------------------------------------------------------------------------
// Serde helper: canonical big-endian amount bytes
// ---------------------------------------------------------------------------

/// Serializes a `BigUint` as its minimal big-endian byte string.
///
/// Zero is `[0]`. On the way back in, empty strings and leading zero bytes
/// are rejected so every amount has exactly one encoding; otherwise two
/// validators could hash different bytes for the same balance.
pub(crate) mod amount_bytes {
    use num_bigint::BigUint;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(amount: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        amount.to_bytes_be().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Vec::deserialize(deserializer)?;
        match bytes.as_slice() {
            [] => Err(D::Error::custom("empty amount encoding")),
            [0, _, ..] => Err(D::Error::custom("amount encoding has leading zero bytes")),
            _ => Ok(BigUint::from_bytes_be(&bytes)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_denoms_accepted() {
        for denom in ["atom", "eth", "stake", "usd1", "abcdefghijklmnop"] {
            assert!(validate_denom(denom).is_ok(), "{} should be valid", denom);
        }
    }

    #[test]
    fn invalid_denoms_rejected() {
        for denom in ["", "at", "Atom", "1atom", "at-om", "abcdefghijklmnopq", "átom"] {
            assert!(
                matches!(validate_denom(denom), Err(CoinsError::InvalidDenom(_))),
                "{:?} should be rejected",
                denom
            );
        }
    }

    #[test]
    fn coin_new_rejects_bad_denom() {
        assert!(Coin::new("ATOM", 10u64).is_err());
    }

    #[test]
    fn zero_coin_is_zero() {
        let coin = Coin::new("atom", 0u64).unwrap();
        assert!(coin.is_zero());
    }

    #[test]
    fn display_and_parse() {
        let coin: Coin = "123atom".parse().unwrap();
        assert_eq!(coin.denom(), "atom");
        assert_eq!(coin.amount(), &BigUint::from(123u64));
        assert_eq!(coin.to_string(), "123atom");
    }

    #[test]
    fn parse_handles_amounts_beyond_u64() {
        let coin: Coin = "340282366920938463463374607431768211456atom".parse().unwrap();
        assert_eq!(coin.amount(), &(BigUint::from(u128::MAX) + 1u32));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("atom".parse::<Coin>().is_err());
        assert!("123".parse::<Coin>().is_err());
        assert!("12 atom".parse::<Coin>().is_err());
    }

    #[test]
    fn json_rejects_invalid_denom() {
        let json = r#"{"denom":"BAD","amount":[5]}"#;
        assert!(serde_json::from_str::<Coin>(json).is_err());
    }

    #[test]
    fn json_rejects_non_minimal_amount() {
        let json = r#"{"denom":"atom","amount":[0,5]}"#;
        assert!(serde_json::from_str::<Coin>(json).is_err());

        let json = r#"{"denom":"atom","amount":[]}"#;
        assert!(serde_json::from_str::<Coin>(json).is_err());
    }

    #[test]
    fn json_roundtrip() {
        let coin = Coin::new("eth", 246u64).unwrap();
        let json = serde_json::to_string(&coin).expect("serialize");
        let recovered: Coin = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(recovered, coin);
    }
}
