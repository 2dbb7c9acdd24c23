//! # Vesting Accounts
//!
//! A [`VestingAccount`] is a [`BaseAccount`] whose balance is partly locked
//! by a [`VestingSchedule`]. The lock only limits what can be *spent*; the
//! balance itself is still replaced wholesale through
//! [`Account::set_coins`].
//!
//! ## Spendable balance
//!
//! ```text
//! locked    = max(vesting(t) - delegated_vesting, 0)   per denom
//! spendable = max(coins - locked, 0)                   per denom
//! ```
//!
//! If a transfer already took the balance below the locked amount, the
//! account can spend down to zero and no further. It is not an error.
//!
//! ## Delegation tracking
//!
//! Locked coins may still be delegated. Delegations draw from the locked
//! part first (`delegated_vesting`), then from free coins
//! (`delegated_free`). Undelegations return free coins first. Delegated
//! vesting coins no longer count as locked in the balance, because they
//! have already left it.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::schedule::{ContinuousSchedule, DelayedSchedule, VestingSchedule};
use crate::account::{Account, BaseAccount};
use crate::coins::{Coin, Coins};
use crate::crypto::{Address, PubKey};
use crate::error::AuthError;

/// A base account plus a vesting schedule and delegation bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVestingAccount")]
pub struct VestingAccount {
    base: BaseAccount,
    schedule: VestingSchedule,
    delegated_free: Coins,
    delegated_vesting: Coins,
}

/// Wire shape of a [`VestingAccount`] before the schedule is checked.
///
/// Balance coverage is not re-checked here: delegations legitimately take
/// the balance below the original vesting amount.
#[derive(Deserialize)]
struct RawVestingAccount {
    base: BaseAccount,
    schedule: VestingSchedule,
    delegated_free: Coins,
    delegated_vesting: Coins,
}

impl TryFrom<RawVestingAccount> for VestingAccount {
    type Error = AuthError;

    fn try_from(raw: RawVestingAccount) -> Result<Self, Self::Error> {
        ensure_original_vesting(raw.schedule.original_vesting())?;
        Ok(Self {
            base: raw.base,
            schedule: raw.schedule,
            delegated_free: raw.delegated_free,
            delegated_vesting: raw.delegated_vesting,
        })
    }
}

impl VestingAccount {
    /// Creates a continuous vesting account at `address` holding exactly
    /// `original_vesting`, unlocking linearly from `start` to `end`.
    pub fn new_continuous(
        address: Address,
        original_vesting: Coins,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let mut base = BaseAccount::with_address(address);
        base.set_coins(original_vesting.clone())?;
        Self::continuous(base, original_vesting, start, end)
    }

    /// Creates a delayed vesting account at `address` holding exactly
    /// `original_vesting`, unlocking everything at `end`.
    pub fn new_delayed(
        address: Address,
        original_vesting: Coins,
        end: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let mut base = BaseAccount::with_address(address);
        base.set_coins(original_vesting.clone())?;
        Self::delayed(base, original_vesting, end)
    }

    /// Wraps an existing account in a continuous schedule.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidSchedule`] if `end` is not after `start`.
    /// - [`AuthError::InvalidVestingAmount`] if `original_vesting` is empty
    ///   or not covered by the account's coins.
    pub fn continuous(
        base: BaseAccount,
        original_vesting: Coins,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let schedule = ContinuousSchedule::new(original_vesting, start, end)?;
        Self::with_schedule(base, VestingSchedule::Continuous(schedule))
    }

    /// Wraps an existing account in a delayed schedule.
    pub fn delayed(
        base: BaseAccount,
        original_vesting: Coins,
        end: DateTime<Utc>,
    ) -> Result<Self, AuthError> {
        let schedule = DelayedSchedule::new(original_vesting, end);
        Self::with_schedule(base, VestingSchedule::Delayed(schedule))
    }

    /// Wraps an existing account in any schedule.
    ///
    /// The schedule may not lock a denomination, or an amount of one, that
    /// the account does not hold.
    pub fn with_schedule(base: BaseAccount, schedule: VestingSchedule) -> Result<Self, AuthError> {
        let original = schedule.original_vesting();
        ensure_original_vesting(original)?;

        if !base.coins().is_all_gte(original) {
            debug!(coins = %base.coins(), %original, "vesting amount not covered by balance");
            return Err(AuthError::InvalidVestingAmount(format!(
                "account holds {} but schedule locks {}",
                base.coins(),
                original
            )));
        }

        Ok(Self {
            base,
            schedule,
            delegated_free: Coins::empty(),
            delegated_vesting: Coins::empty(),
        })
    }

    // -----------------------------------------------------------------------
    // Schedule queries
    // -----------------------------------------------------------------------

    pub fn schedule(&self) -> &VestingSchedule {
        &self.schedule
    }

    pub fn original_vesting(&self) -> &Coins {
        self.schedule.original_vesting()
    }

    /// Unix seconds; `None` for delayed schedules.
    pub fn start_time(&self) -> Option<i64> {
        self.schedule.start_time()
    }

    /// Unix seconds.
    pub fn end_time(&self) -> i64 {
        self.schedule.end_time()
    }

    pub fn vested_coins(&self, block_time: DateTime<Utc>) -> Option<Coins> {
        self.schedule.vested_coins(block_time)
    }

    pub fn vesting_coins(&self, block_time: DateTime<Utc>) -> Option<Coins> {
        self.schedule.vesting_coins(block_time)
    }

    pub fn delegated_free(&self) -> &Coins {
        &self.delegated_free
    }

    pub fn delegated_vesting(&self) -> &Coins {
        &self.delegated_vesting
    }

    pub fn base(&self) -> &BaseAccount {
        &self.base
    }

    pub fn into_base(self) -> BaseAccount {
        self.base
    }

    // -----------------------------------------------------------------------
    // Delegation tracking
    // -----------------------------------------------------------------------

    /// Records a delegation of `amount` at `block_time` and debits it from
    /// the balance.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidVestingAmount`] if `amount` is empty.
    /// - [`AuthError::InsufficientFunds`] if the balance does not cover
    ///   `amount`. Nothing is modified.
    pub fn track_delegation(
        &mut self,
        block_time: DateTime<Utc>,
        amount: &Coins,
    ) -> Result<(), AuthError> {
        if amount.is_empty() {
            return Err(AuthError::InvalidVestingAmount(
                "delegation amount is empty".to_string(),
            ));
        }

        let remaining = self.base.coins().try_sub(amount).map_err(|err| {
            debug!(%amount, coins = %self.base.coins(), "delegation exceeds balance");
            err
        })?;
        let vesting = self.vesting_coins(block_time).unwrap_or_default();

        let mut to_vesting = Vec::with_capacity(amount.len());
        let mut to_free = Vec::with_capacity(amount.len());
        for coin in amount {
            let denom = coin.denom();
            let lockable = sub_floor(
                &vesting.amount_of(denom),
                &self.delegated_vesting.amount_of(denom),
            );
            let x = lockable.min(coin.amount().clone());
            let y = coin.amount() - &x;
            to_vesting.push(Coin::new(denom, x)?);
            to_free.push(Coin::new(denom, y)?);
        }

        self.delegated_vesting = self.delegated_vesting.add(&Coins::new(to_vesting)?);
        self.delegated_free = self.delegated_free.add(&Coins::new(to_free)?);
        self.base.set_coins(remaining)
    }

    /// Records an undelegation of `amount` and credits it back to the
    /// balance. Free delegations are released before vesting ones.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidVestingAmount`] if `amount` is empty.
    /// - [`AuthError::InsufficientFunds`] if `amount` exceeds what is
    ///   currently delegated. Nothing is modified.
    pub fn track_undelegation(&mut self, amount: &Coins) -> Result<(), AuthError> {
        if amount.is_empty() {
            return Err(AuthError::InvalidVestingAmount(
                "undelegation amount is empty".to_string(),
            ));
        }

        let delegated = self.delegated_free.add(&self.delegated_vesting);
        if !delegated.is_all_gte(amount) {
            debug!(%amount, %delegated, "undelegation exceeds delegated coins");
            return Err(AuthError::InsufficientFunds {
                balance: delegated,
                requested: amount.clone(),
            });
        }

        let mut from_free = Vec::with_capacity(amount.len());
        let mut from_vesting = Vec::with_capacity(amount.len());
        for coin in amount {
            let denom = coin.denom();
            let x = self.delegated_free.amount_of(denom).min(coin.amount().clone());
            let y = (coin.amount() - &x).min(self.delegated_vesting.amount_of(denom));
            from_free.push(Coin::new(denom, x)?);
            from_vesting.push(Coin::new(denom, y)?);
        }

        self.delegated_free = self.delegated_free.saturating_sub(&Coins::new(from_free)?);
        self.delegated_vesting = self
            .delegated_vesting
            .saturating_sub(&Coins::new(from_vesting)?);

        let coins = self.base.coins().add(amount);
        self.base.set_coins(coins)
    }
}

/// Every vesting account locks something.
fn ensure_original_vesting(original: &Coins) -> Result<(), AuthError> {
    if original.is_empty() {
        debug!("rejecting vesting account with empty original vesting");
        return Err(AuthError::InvalidVestingAmount(
            "original vesting is empty".to_string(),
        ));
    }
    Ok(())
}

fn sub_floor(a: &BigUint, b: &BigUint) -> BigUint {
    if a > b {
        a - b
    } else {
        BigUint::default()
    }
}

impl Account for VestingAccount {
    fn address(&self) -> Option<&Address> {
        self.base.address()
    }

    fn set_address(&mut self, address: Address) -> Result<(), AuthError> {
        self.base.set_address(address)
    }

    fn pub_key(&self) -> Option<&PubKey> {
        self.base.pub_key()
    }

    fn set_pub_key(&mut self, pub_key: PubKey) -> Result<(), AuthError> {
        self.base.set_pub_key(pub_key)
    }

    fn coins(&self) -> &Coins {
        self.base.coins()
    }

    fn set_coins(&mut self, coins: Coins) -> Result<(), AuthError> {
        self.base.set_coins(coins)
    }

    fn account_number(&self) -> u64 {
        self.base.account_number()
    }

    fn set_account_number(&mut self, account_number: u64) -> Result<(), AuthError> {
        self.base.set_account_number(account_number)
    }

    fn sequence(&self) -> u64 {
        self.base.sequence()
    }

    fn set_sequence(&mut self, sequence: u64) -> Result<(), AuthError> {
        self.base.set_sequence(sequence)
    }

    fn spendable_coins(&self, block_time: DateTime<Utc>) -> Coins {
        let vesting = self.vesting_coins(block_time).unwrap_or_default();
        let locked = vesting.saturating_sub(&self.delegated_vesting);
        self.base.coins().saturating_sub(&locked)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
