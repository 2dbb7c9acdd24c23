//! # Account Identity Primitives
//!
//! The account layer does not generate keys or verify signatures; that is
//! the signing collaborator's job. It only needs two opaque values:
//!
//! - [`PubKey`]: the 32-byte Ed25519 public key an account may carry.
//! - [`Address`]: the 20-byte identifier an account is stored under,
//!   derived from a public key as `SHA-256(pubkey)[..20]`.
//!
//! Both are plain `Copy` byte arrays with fixed serialized size, which keeps
//! the account encoding trivially deterministic.

pub mod address;
pub mod keys;

pub use address::Address;
pub use keys::PubKey;

use thiserror::Error;

/// Errors that can occur while parsing addresses or public keys.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Raw bytes had the wrong length.
    #[error("invalid {kind} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// What was being parsed ("address" or "public key").
        kind: &'static str,
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The decoded address has an unexpected human-readable prefix.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp {
        /// The expected HRP.
        expected: String,
        /// The HRP that was actually found.
        got: String,
    },

    /// Hex input could not be decoded.
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}
