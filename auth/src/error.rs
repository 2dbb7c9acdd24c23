//! Error types for the account layer.
//!
//! Every fallible operation in this crate returns an [`AuthError`]. Lower
//! level concerns ([`CoinsError`], [`DecodeError`]) keep their own enums and
//! fold in through `#[from]`.

use thiserror::Error;

use crate::coins::{Coins, CoinsError};
use crate::codec::DecodeError;
use crate::crypto::Address;

/// Errors that can occur while building, mutating or decoding accounts.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The account already has a different address bound to it.
    #[error("address already set: account is bound to {current}, refusing {attempted}")]
    AddressAlreadySet {
        /// The address currently bound to the account.
        current: Address,
        /// The address the caller tried to bind.
        attempted: Address,
    },

    /// A subtraction would have driven a denomination below zero.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The coins that were available.
        balance: Coins,
        /// The coins that were requested.
        requested: Coins,
    },

    /// The vesting amount references coins the account cannot cover.
    #[error("invalid vesting amount: {0}")]
    InvalidVestingAmount(String),

    /// The vesting window is empty or inverted.
    #[error("invalid vesting schedule: end time {end_time} must be after start time {start_time}")]
    InvalidSchedule {
        /// Schedule start, Unix seconds.
        start_time: i64,
        /// Schedule end, Unix seconds.
        end_time: i64,
    },

    /// Coin construction or parsing failed.
    #[error("coins error: {0}")]
    Coins(#[from] CoinsError),

    /// Serialized bytes were truncated or malformed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The account could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}
