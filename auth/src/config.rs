//! # Auth Module Configuration & Constants
//!
//! Every magic number in the account layer lives here. If you're hardcoding
//! an address length or a codec tag somewhere else, move it here.
//!
//! Most of these values are consensus-critical: the codec tags and length
//! rules define the bytes that end up in the state store, and every
//! validator must agree on them. Changing them after launch is a hard fork.

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Length of an account address in bytes. Addresses are the first 20 bytes
/// of SHA-256 over the public key.
pub const ADDRESS_LENGTH: usize = 20;

/// Ed25519 public key length in bytes.
pub const PUBKEY_LENGTH: usize = 32;

/// Bech32 human-readable prefix for account addresses.
pub const ACCOUNT_HRP: &str = "nova";

// ---------------------------------------------------------------------------
// Denominations
// ---------------------------------------------------------------------------

/// Shortest accepted denomination, e.g. `"eth"`.
pub const MIN_DENOM_LENGTH: usize = 3;

/// Longest accepted denomination.
pub const MAX_DENOM_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Size of the big-endian `u32` length prefix in front of every encoded
/// account.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Upper bound on an encoded account body (tag + payload). Anything larger
/// is rejected before bincode gets a chance to allocate for it.
pub const MAX_ENCODED_ACCOUNT_SIZE: usize = 64 * 1024;

/// Type tag for [`BaseAccount`](crate::account::BaseAccount).
pub const BASE_ACCOUNT_TAG: u8 = 0x01;

/// Type tag for [`VestingAccount`](crate::vesting::VestingAccount).
pub const VESTING_ACCOUNT_TAG: u8 = 0x02;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns a friendly name for an account type tag, mainly for logging.
/// Unknown tags get a hex dump.
pub fn account_kind_name(tag: u8) -> String {
    match tag {
        BASE_ACCOUNT_TAG => "base".to_string(),
        VESTING_ACCOUNT_TAG => "vesting".to_string(),
        other => format!("unknown(0x{:02X})", other),
    }
}
