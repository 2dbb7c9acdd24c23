//! # Accounts
//!
//! Two concrete account variants share one capability interface:
//!
//! ```text
//! base.rs         : BaseAccount: address, pubkey, coins, number, sequence
//! vesting (crate) : VestingAccount: BaseAccount + a vesting schedule
//! ```
//!
//! Callers that load accounts from the state store don't know the variant
//! up front, so they get an [`AnyAccount`]: a tagged union selected by the
//! codec's type tag. Everything that doesn't care about vesting goes through
//! the [`Account`] trait.
//!
//! None of these types synchronize. The state store serializes writers;
//! read-only snapshots can be shared freely.

pub mod base;

pub use base::BaseAccount;

use chrono::{DateTime, Utc};

use crate::coins::Coins;
use crate::crypto::{Address, PubKey};
use crate::error::AuthError;
use crate::vesting::VestingAccount;

// ---------------------------------------------------------------------------
// Account trait
// ---------------------------------------------------------------------------

/// Accessors shared by every account variant.
///
/// Setters return `Result` uniformly so that variants with stricter rules
/// can refuse a write without changing the call sites. Today only
/// [`set_address`](Account::set_address) can fail.
pub trait Account {
    /// The bound address, or `None` for an empty account.
    fn address(&self) -> Option<&Address>;

    /// Binds `address`.
    ///
    /// # Errors
    ///
    /// [`AuthError::AddressAlreadySet`] if a different address is already
    /// bound. The stored address is left untouched.
    fn set_address(&mut self, address: Address) -> Result<(), AuthError>;

    fn pub_key(&self) -> Option<&PubKey>;

    /// Replaces the public key. Never fails.
    fn set_pub_key(&mut self, pub_key: PubKey) -> Result<(), AuthError>;

    fn coins(&self) -> &Coins;

    /// Replaces the whole balance. No arithmetic checks happen here.
    fn set_coins(&mut self, coins: Coins) -> Result<(), AuthError>;

    fn account_number(&self) -> u64;

    /// Stores the account number verbatim. The state store assigns it once;
    /// keeping it fixed afterwards is the caller's responsibility.
    fn set_account_number(&mut self, account_number: u64) -> Result<(), AuthError>;

    fn sequence(&self) -> u64;

    /// Stores the sequence verbatim.
    fn set_sequence(&mut self, sequence: u64) -> Result<(), AuthError>;

    /// Coins that may leave the account at `block_time`.
    fn spendable_coins(&self, block_time: DateTime<Utc>) -> Coins;
}

// ---------------------------------------------------------------------------
// AnyAccount
// ---------------------------------------------------------------------------

/// An account of either variant, as loaded from the state store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyAccount {
    Base(BaseAccount),
    Vesting(VestingAccount),
}

impl AnyAccount {
    /// Returns the vesting view, if this is a vesting account.
    pub fn as_vesting(&self) -> Option<&VestingAccount> {
        match self {
            AnyAccount::Vesting(account) => Some(account),
            AnyAccount::Base(_) => None,
        }
    }

    pub fn as_vesting_mut(&mut self) -> Option<&mut VestingAccount> {
        match self {
            AnyAccount::Vesting(account) => Some(account),
            AnyAccount::Base(_) => None,
        }
    }

    fn inner(&self) -> &dyn Account {
        match self {
            AnyAccount::Base(account) => account,
            AnyAccount::Vesting(account) => account,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Account {
        match self {
            AnyAccount::Base(account) => account,
            AnyAccount::Vesting(account) => account,
        }
    }
}

impl From<BaseAccount> for AnyAccount {
    fn from(account: BaseAccount) -> Self {
        AnyAccount::Base(account)
    }
}

impl From<VestingAccount> for AnyAccount {
    fn from(account: VestingAccount) -> Self {
        AnyAccount::Vesting(account)
    }
}

impl Account for AnyAccount {
    fn address(&self) -> Option<&Address> {
        self.inner().address()
    }

    fn set_address(&mut self, address: Address) -> Result<(), AuthError> {
        self.inner_mut().set_address(address)
    }

    fn pub_key(&self) -> Option<&PubKey> {
        self.inner().pub_key()
    }

    fn set_pub_key(&mut self, pub_key: PubKey) -> Result<(), AuthError> {
        self.inner_mut().set_pub_key(pub_key)
    }

    fn coins(&self) -> &Coins {
        self.inner().coins()
    }

    fn set_coins(&mut self, coins: Coins) -> Result<(), AuthError> {
        self.inner_mut().set_coins(coins)
    }

    fn account_number(&self) -> u64 {
        self.inner().account_number()
    }

    fn set_account_number(&mut self, account_number: u64) -> Result<(), AuthError> {
        self.inner_mut().set_account_number(account_number)
    }

    fn sequence(&self) -> u64 {
        self.inner().sequence()
    }

    fn set_sequence(&mut self, sequence: u64) -> Result<(), AuthError> {
        self.inner_mut().set_sequence(sequence)
    }

    fn spendable_coins(&self, block_time: DateTime<Utc>) -> Coins {
        self.inner().spendable_coins(block_time)
    }
}
