//! # Account Public Keys
//!
//! [`PubKey`] is the public half of an Ed25519 identity as far as the
//! account layer cares: 32 bytes we store, return and hash into an address.
//! Point validation and signature checks belong to the signing collaborator.
//!
//! Key bytes are never logged.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Address, IdentityError};
use crate::config::{ADDRESS_LENGTH, PUBKEY_LENGTH};

/// An Ed25519 public key attached to an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubKey([u8; PUBKEY_LENGTH]);

impl PubKey {
    pub fn from_bytes(bytes: [u8; PUBKEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a slice, checking only the length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, IdentityError> {
        let bytes: [u8; PUBKEY_LENGTH] =
            slice.try_into().map_err(|_| IdentityError::InvalidLength {
                kind: "public key",
                expected: PUBKEY_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        Self::try_from_slice(&hex::decode(s)?)
    }

    /// The address this key controls: `SHA-256(key)[..20]`.
    ///
    /// Signature verifiers compare this against the account's stored
    /// address before trusting the key.
    pub fn address(&self) -> Address {
        let digest = Sha256::digest(self.0);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Address::from_bytes(bytes)
    }
}

impl From<&VerifyingKey> for PubKey {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl From<VerifyingKey> for PubKey {
    fn from(key: VerifyingKey) -> Self {
        Self::from(&key)
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({}...)", &self.to_hex()[..12])
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
