//! # Account Addresses
//!
//! An [`Address`] is 20 raw bytes. Humans see it as Bech32 with the `nova`
//! prefix (`nova1...`); the state store sees it as the bytes themselves.
//!
//! ```text
//! pubkey (32 bytes)
//!     -> SHA-256(pubkey) -> 32 bytes
//!     -> first 20 bytes  -> Address
//!     -> Bech32("nova", address) -> nova1...
//! ```

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};

use super::IdentityError;
use crate::config::{ACCOUNT_HRP, ADDRESS_LENGTH};

/// A fixed-length account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a slice, checking the length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, IdentityError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            slice.try_into().map_err(|_| IdentityError::InvalidLength {
                kind: "address",
                expected: ADDRESS_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        Self::try_from_slice(&hex::decode(s)?)
    }

    /// Parses a Bech32 `nova1...` address, validating HRP, checksum and
    /// payload length.
    pub fn from_bech32(s: &str) -> Result<Self, IdentityError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| IdentityError::Bech32Decode(e.to_string()))?;

        let expected = Hrp::parse(ACCOUNT_HRP).map_err(|e| IdentityError::Bech32Decode(e.to_string()))?;
        if hrp != expected {
            return Err(IdentityError::InvalidHrp {
                expected: ACCOUNT_HRP.to_string(),
                got: hrp.to_string(),
            });
        }

        Self::try_from_slice(&data)
    }

    /// Encodes the address as Bech32.
    pub fn to_bech32(&self) -> Result<String, IdentityError> {
        let hrp = Hrp::parse(ACCOUNT_HRP).map_err(|e| IdentityError::Bech32Decode(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| IdentityError::Bech32Decode(e.to_string()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_bech32() {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => f.write_str(&self.to_hex()),
        }
    }
}

impl FromStr for Address {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Address {
        Address::from_bytes([0x42; ADDRESS_LENGTH])
    }

    #[test]
    fn bech32_roundtrip() {
        let addr = sample();
        let encoded = addr.to_string();
        assert!(encoded.starts_with("nova1"));

        let recovered: Address = encoded.parse().unwrap();
        assert_eq!(recovered, addr);
    }

    #[test]
    fn wrong_hrp_rejected() {
        let hrp = Hrp::parse("cosmos").unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &[0x42; ADDRESS_LENGTH]).unwrap();
        let err = Address::from_bech32(&encoded).unwrap_err();
        assert!(matches!(err, IdentityError::InvalidHrp { .. }));
    }

    #[test]
    fn wrong_length_rejected() {
        let hrp = Hrp::parse(ACCOUNT_HRP).unwrap();
        let encoded = bech32::encode::<Bech32>(hrp, &[0x42; 32]).unwrap();
        let err = Address::from_bech32(&encoded).unwrap_err();
        assert!(matches!(
            err,
            IdentityError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: 32,
                ..
            }
        ));
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let mut encoded = sample().to_string();
        let last = encoded.pop().unwrap();
        encoded.push(if last == 'q' { 'p' } else { 'q' });
        assert!(Address::from_bech32(&encoded).is_err());
    }

    #[test]
    fn hex_roundtrip() {
        let addr = sample();
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
        assert!(Address::from_hex("abcd").is_err());
    }
}
