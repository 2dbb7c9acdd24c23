//! # Base Account
//!
//! The plain account every other variant builds on: an address, an optional
//! public key, a balance, an account number and a sequence.
//!
//! ## Mutation rules
//!
//! | Field            | Setter behaviour                                    |
//! |------------------|-----------------------------------------------------|
//! | `address`        | set once; a different value is refused              |
//! | `pub_key`        | free to replace (key rotation)                      |
//! | `coins`          | wholesale replacement, no arithmetic checks         |
//! | `account_number` | verbatim; the state store assigns it once           |
//! | `sequence`       | verbatim; the ante handler enforces ordering        |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Account;
use crate::coins::Coins;
use crate::crypto::{Address, PubKey};
use crate::error::AuthError;

/// A non-vesting account.
///
/// The derived `Default` is the empty account: no address, no key, no
/// coins, number and sequence zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAccount {
    address: Option<Address>,
    pub_key: Option<PubKey>,
    coins: Coins,
    account_number: u64,
    sequence: u64,
}

impl BaseAccount {
    /// Creates an empty account bound to `address`.
    pub fn with_address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Default::default()
        }
    }

    /// Creates an account with every field populated.
    pub fn new(
        address: Address,
        pub_key: Option<PubKey>,
        coins: Coins,
        account_number: u64,
        sequence: u64,
    ) -> Self {
        Self {
            address: Some(address),
            pub_key,
            coins,
            account_number,
            sequence,
        }
    }
}

impl Account for BaseAccount {
    fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    fn set_address(&mut self, address: Address) -> Result<(), AuthError> {
        match self.address {
            Some(current) if current != address => {
                warn!(%current, attempted = %address, "refusing to overwrite account address");
                Err(AuthError::AddressAlreadySet {
                    current,
                    attempted: address,
                })
            }
            _ => {
                self.address = Some(address);
                Ok(())
            }
        }
    }

    fn pub_key(&self) -> Option<&PubKey> {
        self.pub_key.as_ref()
    }

    fn set_pub_key(&mut self, pub_key: PubKey) -> Result<(), AuthError> {
        self.pub_key = Some(pub_key);
        Ok(())
    }

    fn coins(&self) -> &Coins {
        &self.coins
    }

    fn set_coins(&mut self, coins: Coins) -> Result<(), AuthError> {
        self.coins = coins;
        Ok(())
    }

    fn account_number(&self) -> u64 {
        self.account_number
    }

    fn set_account_number(&mut self, account_number: u64) -> Result<(), AuthError> {
        self.account_number = account_number;
        Ok(())
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn set_sequence(&mut self, sequence: u64) -> Result<(), AuthError> {
        self.sequence = sequence;
        Ok(())
    }

    /// Nothing is locked on a base account.
    fn spendable_coins(&self, _block_time: DateTime<Utc>) -> Coins {
        self.coins.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
