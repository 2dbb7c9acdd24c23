//! # Coins: Multi-Denomination Balances
//!
//! Every balance in the account layer is a [`Coins`] value: a sorted,
//! duplicate-free list of [`Coin`]s with zero entries elided.
//!
//! ```text
//! coin.rs: single (denom, amount) pair, denom rules, amount encoding
//! set.rs : the canonical Coins collection and its arithmetic
//! ```
//!
//! Amounts are `BigUint`. There is no floating point anywhere in here and
//! no fixed-width overflow either: validators on different hardware must
//! land on the same numbers.

pub mod coin;
pub mod set;

pub use coin::{validate_denom, Coin};
pub use set::Coins;

use thiserror::Error;

/// Errors raised while constructing or parsing coins.
#[derive(Debug, Error)]
pub enum CoinsError {
    /// The denomination does not match `[a-z][a-z0-9]{2,15}`.
    #[error("invalid denomination: {0:?}")]
    InvalidDenom(String),

    /// The same denomination appears more than once.
    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),

    /// A canonical coin set carried a zero entry.
    #[error("zero amount for denomination {0} in canonical coins")]
    ZeroAmount(String),

    /// A canonical coin set was not sorted by denomination.
    #[error("coins are not sorted by denomination")]
    NotCanonical,

    /// Text could not be parsed as coins.
    #[error("cannot parse coins: {0}")]
    Parse(String),
}
