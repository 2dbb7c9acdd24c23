//! # Canonical Coin Sets
//!
//! [`Coins`] is the balance type stored on every account. It is always in
//! canonical form:
//!
//! 1. sorted lexicographically by denomination,
//! 2. at most one entry per denomination,
//! 3. no zero amounts.
//!
//! Every operation returns a fresh value in that form. Nothing here mutates
//! in place, so a `Coins` handed to an account never changes under it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize, Serializer};

use super::{Coin, CoinsError};
use crate::error::AuthError;

/// A canonical multiset of coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Builds a canonical set from arbitrary input: zero entries are dropped
    /// and the rest sorted by denomination.
    ///
    /// # Errors
    ///
    /// Returns [`CoinsError::DuplicateDenom`] if a denomination appears twice
    /// with non-zero amounts. Duplicates are not summed; that would hide bugs
    /// in whoever built the list.
    pub fn new(coins: Vec<Coin>) -> Result<Self, CoinsError> {
        let mut coins: Vec<Coin> = coins.into_iter().filter(|c| !c.is_zero()).collect();
        coins.sort_by(|a, b| a.denom().cmp(b.denom()));

        if let Some(pair) = coins.windows(2).find(|w| w[0].denom() == w[1].denom()) {
            return Err(CoinsError::DuplicateDenom(pair[0].denom().to_string()));
        }

        Ok(Self(coins))
    }

    /// The empty set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    fn from_sorted_map(amounts: BTreeMap<&str, BigUint>) -> Self {
        Self(
            amounts
                .into_iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(denom, amount)| Coin::from_parts(denom.to_string(), amount))
                .collect(),
        )
    }

    /// Rebuilds the set with `f` applied to every amount, keeping order and
    /// dropping entries that come out as zero.
    pub(crate) fn map_amounts<F>(&self, f: F) -> Coins
    where
        F: Fn(&Coin) -> BigUint,
    {
        Self(
            self.0
                .iter()
                .map(|c| Coin::from_parts(c.denom().to_string(), f(c)))
                .filter(|c| !c.is_zero())
                .collect(),
        )
    }

    fn to_map(&self) -> BTreeMap<&str, BigUint> {
        self.0
            .iter()
            .map(|c| (c.denom(), c.amount().clone()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Arithmetic
    // -----------------------------------------------------------------------

    /// Union of both sets, summing shared denominations. Never fails.
    pub fn add(&self, other: &Coins) -> Coins {
        let mut sums = self.to_map();
        for coin in &other.0 {
            *sums.entry(coin.denom()).or_default() += coin.amount();
        }
        Self::from_sorted_map(sums)
    }

    /// Subtracts `other`, or returns `None` if any denomination would go
    /// negative (including denominations `self` does not hold).
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut remaining = self.to_map();
        for coin in &other.0 {
            let entry = remaining.get_mut(coin.denom())?;
            if *entry < *coin.amount() {
                return None;
            }
            *entry -= coin.amount();
        }
        Some(Self::from_sorted_map(remaining))
    }

    /// Subtraction with an explicit success flag.
    ///
    /// When the flag is `false` the returned coins are `self`, unchanged, and
    /// must not be used as a balance.
    pub fn safe_sub(&self, other: &Coins) -> (Coins, bool) {
        match self.checked_sub(other) {
            Some(result) => (result, true),
            None => (self.clone(), false),
        }
    }

    /// Like [`checked_sub`](Self::checked_sub), reporting failure as
    /// [`AuthError::InsufficientFunds`].
    pub fn try_sub(&self, other: &Coins) -> Result<Coins, AuthError> {
        self.checked_sub(other)
            .ok_or_else(|| AuthError::InsufficientFunds {
                balance: self.clone(),
                requested: other.clone(),
            })
    }

    /// Per-denomination subtraction floored at zero.
    pub fn saturating_sub(&self, other: &Coins) -> Coins {
        let mut remaining = self.to_map();
        for coin in &other.0 {
            if let Some(entry) = remaining.get_mut(coin.denom()) {
                if *entry <= *coin.amount() {
                    entry.set_zero();
                } else {
                    *entry -= coin.amount();
                }
            }
        }
        Self::from_sorted_map(remaining)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Amount held of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> BigUint {
        self.find(denom)
            .map(|c| c.amount().clone())
            .unwrap_or_default()
    }

    pub fn contains_denom(&self, denom: &str) -> bool {
        self.find(denom).is_some()
    }

    /// `true` if `self` holds at least `other` in every denomination of `other`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .0
            .iter()
            .all(|c| self.find(c.denom()).is_some_and(|own| own.amount() >= c.amount()))
    }

    /// Amounts are unsigned, so a `Coins` can never hold a negative entry.
    pub fn is_any_negative(&self) -> bool {
        false
    }

    /// `true` if the set carries no value. Zero entries are elided, so this
    /// is the same as being empty.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Denominations in canonical order.
    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Coin::denom)
    }

    fn find(&self, denom: &str) -> Option<&Coin> {
        self.0
            .binary_search_by(|c| c.denom().cmp(denom))
            .ok()
            .map(|idx| &self.0[idx])
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Strict conversion used by deserialization: the input must already be
/// canonical. Sanitizing here would let two different byte strings decode
/// to the same balance.
impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinsError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        if let Some(zero) = coins.iter().find(|c| c.is_zero()) {
            return Err(CoinsError::ZeroAmount(zero.denom().to_string()));
        }
        for pair in coins.windows(2) {
            match pair[0].denom().cmp(pair[1].denom()) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => {
                    return Err(CoinsError::DuplicateDenom(pair[0].denom().to_string()))
                }
                std::cmp::Ordering::Greater => return Err(CoinsError::NotCanonical),
            }
        }
        Ok(Self(coins))
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        if coin.is_zero() {
            Self::empty()
        } else {
            Self(vec![coin])
        }
    }
}

impl Serialize for Coins {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", coin)?;
        }
        Ok(())
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    /// Parses a comma-separated list such as `"123atom,246eth"`. The empty
    /// string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coins = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Coins::new(coins)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
