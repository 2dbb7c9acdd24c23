//! # Vesting Schedules
//!
//! A schedule answers one question: of the coins originally locked, how many
//! are free at block time `t`?
//!
//! ## Continuous
//!
//! Linear release between `start` and `end`, per denomination:
//!
//! ```text
//! t <= start : vested = 0
//! t >= end   : vested = original
//! otherwise  : vested = floor(original * (t - start) / (end - start))
//! ```
//!
//! Flooring rounds toward under-vesting, so rounding can never release more
//! than `original`. All arithmetic is `BigUint`; there is no float on this
//! path and there must never be one, or validators drift apart.
//!
//! ## Delayed
//!
//! Everything stays locked until `end`, then everything vests at once.
//!
//! Times are Unix seconds. Queries take `DateTime<Utc>` and truncate to the
//! second, which is block-time resolution anyway.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coins::Coins;
use crate::error::AuthError;

// ---------------------------------------------------------------------------
// ContinuousSchedule
// ---------------------------------------------------------------------------

/// Linear vesting of `original_vesting` over `[start_time, end_time]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContinuousSchedule")]
pub struct ContinuousSchedule {
    original_vesting: Coins,
    start_time: i64,
    end_time: i64,
}

/// Wire shape of a [`ContinuousSchedule`] before the window is checked.
#[derive(Deserialize)]
struct RawContinuousSchedule {
    original_vesting: Coins,
    start_time: i64,
    end_time: i64,
}

impl TryFrom<RawContinuousSchedule> for ContinuousSchedule {
    type Error = AuthError;

    fn try_from(raw: RawContinuousSchedule) -> Result<Self, Self::Error> {
        Self::from_unix(raw.original_vesting, raw.start_time, raw.end_time)
    }
}

impl ContinuousSchedule {
    /// Creates a schedule from block times.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidSchedule`] unless `end` is strictly after `start`
    /// (at second resolution).
    pub fn new(
        original_vesting: Coins,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        Self::from_unix(original_vesting, start.timestamp(), end.timestamp())
    }

    /// Creates a schedule from Unix seconds.
    pub fn from_unix(
        original_vesting: Coins,
        start_time: i64,
        end_time: i64,
    ) -> Result<Self, AuthError> {
        if end_time <= start_time {
            debug!(start_time, end_time, "rejecting empty vesting window");
            return Err(AuthError::InvalidSchedule {
                start_time,
                end_time,
            });
        }
        Ok(Self {
            original_vesting,
            start_time,
            end_time,
        })
    }

    pub fn original_vesting(&self) -> &Coins {
        &self.original_vesting
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Vested coins at Unix time `t`; `None` until the window opens.
    pub fn vested_at(&self, t: i64) -> Option<Coins> {
        if t <= self.start_time {
            return None;
        }
        if t >= self.end_time {
            return Some(self.original_vesting.clone());
        }

        let elapsed = BigUint::from((i128::from(t) - i128::from(self.start_time)).unsigned_abs());
        let duration =
            BigUint::from((i128::from(self.end_time) - i128::from(self.start_time)).unsigned_abs());

        Some(
            self.original_vesting
                .map_amounts(|coin| coin.amount() * &elapsed / &duration),
        )
    }

    /// Still-locked coins at Unix time `t`; `None` once the window closes.
    pub fn vesting_at(&self, t: i64) -> Option<Coins> {
        if t >= self.end_time {
            return None;
        }
        let vested = self.vested_at(t).unwrap_or_default();
        // vested <= original per denomination, so this never clips.
        Some(self.original_vesting.saturating_sub(&vested))
    }
}

// ---------------------------------------------------------------------------
// DelayedSchedule
// ---------------------------------------------------------------------------

/// All of `original_vesting` unlocks at `end_time`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedSchedule {
    original_vesting: Coins,
    end_time: i64,
}

impl DelayedSchedule {
    pub fn new(original_vesting: Coins, end: DateTime<Utc>) -> Self {
        Self::from_unix(original_vesting, end.timestamp())
    }

    pub fn from_unix(original_vesting: Coins, end_time: i64) -> Self {
        Self {
            original_vesting,
            end_time,
        }
    }

    pub fn original_vesting(&self) -> &Coins {
        &self.original_vesting
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    pub fn vested_at(&self, t: i64) -> Option<Coins> {
        (t >= self.end_time).then(|| self.original_vesting.clone())
    }

    pub fn vesting_at(&self, t: i64) -> Option<Coins> {
        (t < self.end_time).then(|| self.original_vesting.clone())
    }
}

// ---------------------------------------------------------------------------
// VestingSchedule
// ---------------------------------------------------------------------------

/// The schedule attached to a vesting account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VestingSchedule {
    Continuous(ContinuousSchedule),
    Delayed(DelayedSchedule),
}

impl VestingSchedule {
    pub fn original_vesting(&self) -> &Coins {
        match self {
            VestingSchedule::Continuous(s) => s.original_vesting(),
            VestingSchedule::Delayed(s) => s.original_vesting(),
        }
    }

    /// Window start in Unix seconds. Delayed schedules have none.
    pub fn start_time(&self) -> Option<i64> {
        match self {
            VestingSchedule::Continuous(s) => Some(s.start_time()),
            VestingSchedule::Delayed(_) => None,
        }
    }

    pub fn end_time(&self) -> i64 {
        match self {
            VestingSchedule::Continuous(s) => s.end_time(),
            VestingSchedule::Delayed(s) => s.end_time(),
        }
    }

    /// Coins released by `block_time`, or `None` if nothing has vested yet.
    pub fn vested_coins(&self, block_time: DateTime<Utc>) -> Option<Coins> {
        let t = block_time.timestamp();
        match self {
            VestingSchedule::Continuous(s) => s.vested_at(t),
            VestingSchedule::Delayed(s) => s.vested_at(t),
        }
    }

    /// Coins still locked at `block_time`, or `None` once fully vested.
    pub fn vesting_coins(&self, block_time: DateTime<Utc>) -> Option<Coins> {
        let t = block_time.timestamp();
        match self {
            VestingSchedule::Continuous(s) => s.vesting_at(t),
            VestingSchedule::Delayed(s) => s.vesting_at(t),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
