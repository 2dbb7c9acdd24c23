//! # Vesting
//!
//! ```text
//! schedule.rs: continuous and delayed release math (pure functions)
//! account.rs : VestingAccount: BaseAccount + schedule + delegation books
//! ```
//!
//! Vesting terms are fixed at construction. Nothing in this module offers a
//! way to change a schedule after the fact.

pub mod account;
pub mod schedule;

pub use account::VestingAccount;
pub use schedule::{ContinuousSchedule, DelayedSchedule, VestingSchedule};
