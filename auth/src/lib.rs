// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Auth: Accounts, Balances and Vesting
//!
//! The account model for the NOVA ledger: who owns what, which key speaks
//! for them, how many transactions they've sent, and how much of their
//! balance is still locked by a vesting schedule.
//!
//! ## Architecture
//!
//! - **coins**: Canonical multi-denomination balances on `BigUint`.
//! - **crypto**: Addresses and public keys as opaque, fixed-size values.
//! - **account**: The `Account` trait, `BaseAccount`, and `AnyAccount`.
//! - **vesting**: Continuous and delayed schedules, `VestingAccount`.
//! - **codec**: Length-prefixed, deterministic binary encoding.
//! - **config**: Protocol constants for all of the above.
//! - **error**: The crate-wide `AuthError`.
//!
//! ## Ground rules
//!
//! 1. Integer arithmetic only. Vesting math must be bit-for-bit identical on
//!    every validator.
//! 2. Canonical data only. Coins are sorted, unique and zero-free; decoding
//!    re-checks all of it.
//! 3. Errors are values. Nothing in here panics on bad input.
//! 4. No I/O, no threads, no locks. The state store owns persistence and
//!    concurrency.

pub mod account;
pub mod codec;
pub mod coins;
pub mod config;
pub mod crypto;
pub mod error;
pub mod vesting;

pub use account::{Account, AnyAccount, BaseAccount};
pub use codec::{AccountCodec, DecodeError};
pub use coins::{Coin, Coins, CoinsError};
pub use crypto::{Address, IdentityError, PubKey};
pub use error::AuthError;
pub use vesting::{ContinuousSchedule, DelayedSchedule, VestingAccount, VestingSchedule};
