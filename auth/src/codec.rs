//! # Account Codec
//!
//! The byte format the state store persists for each account. Every
//! validator hashes these bytes, so the encoding must be a pure function of
//! the field values.
//!
//! ## Frame Layout
//!
//! | Offset | Size | Field                                      |
//! |--------|------|--------------------------------------------|
//! | 0      | 4    | body length `n`, big-endian `u32`          |
//! | 4      | 1    | account type tag (see [`crate::config`])   |
//! | 5      | n-1  | `bincode(account)`                         |
//!
//! The payload uses bincode with fixed-width little-endian integers, a size
//! limit and trailing-byte rejection. Fields go out in declaration order,
//! there are no maps, and amounts are minimal big-endian byte strings.
//!
//! ## Type tags instead of a registry
//!
//! Concrete account types are a closed set known at compile time. Each one
//! implements [`AccountCodec`] with a fixed tag, and [`AnyAccount::decode`]
//! dispatches with a plain `match`. Nothing registers itself at runtime.
//!
//! ## Decoding
//!
//! Decoding either returns a fully validated account or a [`DecodeError`].
//! Length mismatches are caught from the prefix before bincode runs; coins,
//! amounts and schedules re-check their invariants while deserializing.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::account::{AnyAccount, BaseAccount};
use crate::config::{
    account_kind_name, BASE_ACCOUNT_TAG, LENGTH_PREFIX_SIZE, MAX_ENCODED_ACCOUNT_SIZE,
    VESTING_ACCOUNT_TAG,
};
use crate::error::AuthError;
use crate::vesting::VestingAccount;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons an encoded account is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes than the frame requires.
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes the frame declares or requires.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// More bytes than the length prefix declares.
    #[error("{extra} trailing bytes after account body")]
    TrailingBytes {
        /// Number of surplus bytes.
        extra: usize,
    },

    /// The declared body length exceeds [`MAX_ENCODED_ACCOUNT_SIZE`].
    #[error("declared body length {declared} exceeds limit {max}")]
    Oversized {
        /// Declared body length.
        declared: usize,
        /// Configured limit.
        max: usize,
    },

    /// The type tag matches no known account type.
    #[error("unknown account type tag 0x{0:02X}")]
    UnknownTypeTag(u8),

    /// The frame holds a different account type than the caller asked for.
    #[error("expected {expected} account, found {found}")]
    UnexpectedTypeTag {
        /// The requested account kind.
        expected: String,
        /// The kind found in the frame.
        found: String,
    },

    /// The payload is not a valid encoding of the account.
    #[error("malformed account payload: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// AccountCodec
// ---------------------------------------------------------------------------

/// Length-prefixed binary encoding for a concrete account type.
pub trait AccountCodec: Serialize + DeserializeOwned {
    /// Tag written after the length prefix.
    const TYPE_TAG: u8;

    /// Encodes `self` into a complete frame.
    fn encode(&self) -> Result<Vec<u8>, AuthError> {
        encode_frame(Self::TYPE_TAG, self)
    }

    /// Decodes a frame that must hold exactly this account type.
    fn decode(bytes: &[u8]) -> Result<Self, AuthError> {
        let result = split_frame(bytes).and_then(|(tag, payload)| {
            if tag != Self::TYPE_TAG {
                return Err(DecodeError::UnexpectedTypeTag {
                    expected: account_kind_name(Self::TYPE_TAG),
                    found: account_kind_name(tag),
                });
            }
            decode_payload(payload)
        });
        log_rejection(result).map_err(AuthError::from)
    }
}

impl AccountCodec for BaseAccount {
    const TYPE_TAG: u8 = BASE_ACCOUNT_TAG;
}

impl AccountCodec for VestingAccount {
    const TYPE_TAG: u8 = VESTING_ACCOUNT_TAG;
}

impl AnyAccount {
    /// Encodes whichever variant this is, tagged accordingly.
    pub fn encode(&self) -> Result<Vec<u8>, AuthError> {
        match self {
            AnyAccount::Base(account) => account.encode(),
            AnyAccount::Vesting(account) => account.encode(),
        }
    }

    /// Decodes a frame of any known account type.
    pub fn decode(bytes: &[u8]) -> Result<Self, AuthError> {
        let result = split_frame(bytes).and_then(|(tag, payload)| match tag {
            BASE_ACCOUNT_TAG => decode_payload(payload).map(AnyAccount::Base),
            VESTING_ACCOUNT_TAG => decode_payload(payload).map(AnyAccount::Vesting),
            other => Err(DecodeError::UnknownTypeTag(other)),
        });
        log_rejection(result).map_err(AuthError::from)
    }
}

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_ENCODED_ACCOUNT_SIZE as u64)
        .reject_trailing_bytes()
}

fn encode_frame<T: Serialize + ?Sized>(tag: u8, value: &T) -> Result<Vec<u8>, AuthError> {
    let payload = wire_options()
        .serialize(value)
        .map_err(|e| AuthError::Encode(e.to_string()))?;

    let body_len = payload.len() + 1;
    if body_len > MAX_ENCODED_ACCOUNT_SIZE {
        return Err(AuthError::Encode(format!(
            "account body of {} bytes exceeds limit {}",
            body_len, MAX_ENCODED_ACCOUNT_SIZE
        )));
    }
    let prefix = u32::try_from(body_len).map_err(|e| AuthError::Encode(e.to_string()))?;

    let mut frame = Vec::with_capacity(LENGTH_PREFIX_SIZE + body_len);
    frame.extend_from_slice(&prefix.to_be_bytes());
    frame.push(tag);
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Checks the length prefix against the buffer and splits off the tag.
fn split_frame(bytes: &[u8]) -> Result<(u8, &[u8]), DecodeError> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(DecodeError::Truncated {
            expected: LENGTH_PREFIX_SIZE,
            actual: bytes.len(),
        });
    }

    let (prefix, body) = bytes.split_at(LENGTH_PREFIX_SIZE);
    let mut len_bytes = [0u8; LENGTH_PREFIX_SIZE];
    len_bytes.copy_from_slice(prefix);
    let declared = u32::from_be_bytes(len_bytes) as usize;

    if declared > MAX_ENCODED_ACCOUNT_SIZE {
        return Err(DecodeError::Oversized {
            declared,
            max: MAX_ENCODED_ACCOUNT_SIZE,
        });
    }
    if body.len() < declared {
        return Err(DecodeError::Truncated {
            expected: declared,
            actual: body.len(),
        });
    }
    if body.len() > declared {
        return Err(DecodeError::TrailingBytes {
            extra: body.len() - declared,
        });
    }

    body.split_first()
        .map(|(tag, payload)| (*tag, payload))
        .ok_or_else(|| DecodeError::Malformed("empty account body".to_string()))
}

fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, DecodeError> {
    wire_options()
        .deserialize(payload)
        .map_err(|e| DecodeError::Malformed(e.to_string()))
}

fn log_rejection<T>(result: Result<T, DecodeError>) -> Result<T, DecodeError> {
    if let Err(err) = &result {
        debug!(error = %err, "rejected encoded account");
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::coins::Coins;
    use crate::config::{ADDRESS_LENGTH, PUBKEY_LENGTH};
    use crate::crypto::{Address, PubKey};
    use chrono::{Duration, Utc};

    fn sample_base() -> BaseAccount {
        let coins: Coins = "123atom,246eth".parse().unwrap();
        BaseAccount::new(
            Address::from_bytes([0x33; ADDRESS_LENGTH]),
            Some(PubKey::from_bytes([0x44; PUBKEY_LENGTH])),
            coins,
            12,
            7,
        )
    }

    fn sample_vesting() -> VestingAccount {
        let now = Utc::now();
        let mut acc = VestingAccount::new_continuous(
            Address::from_bytes([0x55; ADDRESS_LENGTH]),
            "1000stake".parse().unwrap(),
            now,
            now + Duration::days(30),
        )
        .unwrap();
        acc.track_delegation(now, &"400stake".parse().unwrap()).unwrap();
        acc
    }

    #[test]
    fn base_roundtrip() {
        let acc = sample_base();
        let bytes = acc.encode().unwrap();
        let decoded = BaseAccount::decode(&bytes).unwrap();
        assert_eq!(decoded, acc);
    }

    #[test]
    fn empty_base_roundtrip() {
        let acc = BaseAccount::default();
        let decoded = BaseAccount::decode(&acc.encode().unwrap()).unwrap();
        assert_eq!(decoded, acc);
        assert_eq!(decoded.address(), None);
    }

    #[test]
    fn vesting_roundtrip() {
        let acc = sample_vesting();
        let decoded = VestingAccount::decode(&acc.encode().unwrap()).unwrap();
        assert_eq!(decoded, acc);
        assert_eq!(decoded.delegated_vesting().to_string(), "400stake");
    }

    #[test]
    fn any_account_dispatches_on_tag() {
        let base = AnyAccount::from(sample_base());
        let vesting = AnyAccount::from(sample_vesting());

        assert_eq!(AnyAccount::decode(&base.encode().unwrap()).unwrap(), base);
        assert_eq!(AnyAccount::decode(&vesting.encode().unwrap()).unwrap(), vesting);
    }

    #[test]
    fn frame_layout() {
        let bytes = sample_base().encode().unwrap();
        let declared = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert_eq!(declared, bytes.len() - LENGTH_PREFIX_SIZE);
        assert_eq!(bytes[LENGTH_PREFIX_SIZE], BASE_ACCOUNT_TAG);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = sample_base().encode().unwrap();
        let b = sample_base().encode().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn truncated_half_rejected() {
        let bytes = sample_base().encode().unwrap();
        let err = BaseAccount::decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Decode(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn every_truncation_rejected() {
        let bytes = sample_vesting().encode().unwrap();
        for cut in 0..bytes.len() {
            assert!(
                AnyAccount::decode(&bytes[..cut]).is_err(),
                "prefix of {} bytes decoded",
                cut
            );
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample_base().encode().unwrap();
        bytes.push(0);
        let err = BaseAccount::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Decode(DecodeError::TrailingBytes { extra: 1 })
        ));
    }

    #[test]
    fn lying_prefix_rejected() {
        // Prefix shrunk by one and the last byte dropped: the frame is
        // consistent but the payload is cut short.
        let mut bytes = sample_base().encode().unwrap();
        bytes.pop();
        let declared = (bytes.len() - LENGTH_PREFIX_SIZE) as u32;
        bytes[..LENGTH_PREFIX_SIZE].copy_from_slice(&declared.to_be_bytes());
        let err = BaseAccount::decode(&bytes).unwrap_err();
        assert!(matches!(err, AuthError::Decode(DecodeError::Malformed(_))));
    }

    #[test]
    fn oversized_prefix_rejected() {
        let mut bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        bytes.push(BASE_ACCOUNT_TAG);
        let err = AnyAccount::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Decode(DecodeError::Oversized { .. })
        ));
    }

    #[test]
    fn zero_length_body_rejected() {
        let err = AnyAccount::decode(&[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, AuthError::Decode(DecodeError::Malformed(_))));
    }

    #[test]
    fn unknown_tag_rejected() {
        let mut bytes = sample_base().encode().unwrap();
        bytes[LENGTH_PREFIX_SIZE] = 0x7F;
        let err = AnyAccount::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Decode(DecodeError::UnknownTypeTag(0x7F))
        ));
    }

    #[test]
    fn wrong_concrete_type_rejected() {
        let bytes = sample_base().encode().unwrap();
        let err = VestingAccount::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            AuthError::Decode(DecodeError::UnexpectedTypeTag { .. })
        ));
    }

    // Hand-built payloads in the same field layout as the real types, so
    // tests can put invalid values on the wire.

    #[derive(Serialize)]
    struct RawCoin<'a> {
        denom: &'a str,
        amount: Vec<u8>,
    }

    #[derive(Serialize)]
    struct RawBase<'a> {
        address: Option<[u8; ADDRESS_LENGTH]>,
        pub_key: Option<[u8; PUBKEY_LENGTH]>,
        coins: Vec<RawCoin<'a>>,
        account_number: u64,
        sequence: u64,
    }

    #[derive(Serialize)]
    enum RawSchedule<'a> {
        Continuous {
            original_vesting: Vec<RawCoin<'a>>,
            start_time: i64,
            end_time: i64,
        },
        Delayed {
            original_vesting: Vec<RawCoin<'a>>,
            end_time: i64,
        },
    }

    #[derive(Serialize)]
    struct RawVesting<'a> {
        base: RawBase<'a>,
        schedule: RawSchedule<'a>,
        delegated_free: Vec<RawCoin<'a>>,
        delegated_vesting: Vec<RawCoin<'a>>,
    }

    fn raw_stake(amount: u8) -> Vec<RawCoin<'static>> {
        vec![RawCoin { denom: "stake", amount: vec![amount] }]
    }

    fn raw_vesting(schedule: RawSchedule<'static>) -> Vec<u8> {
        let raw = RawVesting {
            base: RawBase {
                address: Some([0x66; ADDRESS_LENGTH]),
                pub_key: None,
                coins: raw_stake(100),
                account_number: 1,
                sequence: 0,
            },
            schedule,
            delegated_free: Vec::new(),
            delegated_vesting: Vec::new(),
        };
        encode_frame(VESTING_ACCOUNT_TAG, &raw).unwrap()
    }

    #[test]
    fn hand_built_vesting_frame_decodes() {
        let bytes = raw_vesting(RawSchedule::Continuous {
            original_vesting: raw_stake(100),
            start_time: 10,
            end_time: 20,
        });
        let decoded = VestingAccount::decode(&bytes).unwrap();
        assert_eq!(decoded.start_time(), Some(10));
        assert_eq!(decoded.end_time(), 20);
        assert_eq!(decoded.original_vesting().to_string(), "100stake");
    }

    #[test]
    fn inverted_window_frame_rejected() {
        for (start_time, end_time) in [(20, 20), (30, 20)] {
            let bytes = raw_vesting(RawSchedule::Continuous {
                original_vesting: raw_stake(100),
                start_time,
                end_time,
            });
            let err = VestingAccount::decode(&bytes).unwrap_err();
            assert!(matches!(err, AuthError::Decode(DecodeError::Malformed(_))));
        }
    }

    #[test]
    fn empty_original_vesting_frame_rejected() {
        let delayed = raw_vesting(RawSchedule::Delayed {
            original_vesting: Vec::new(),
            end_time: 10,
        });
        let err = AnyAccount::decode(&delayed).unwrap_err();
        assert!(matches!(err, AuthError::Decode(DecodeError::Malformed(_))));

        let continuous = raw_vesting(RawSchedule::Continuous {
            original_vesting: Vec::new(),
            start_time: 10,
            end_time: 20,
        });
        let err = VestingAccount::decode(&continuous).unwrap_err();
        assert!(matches!(err, AuthError::Decode(DecodeError::Malformed(_))));
    }

    #[test]
    fn delegated_vesting_frame_skips_coverage_check() {
        // Balance below the original vesting is the normal state after a
        // delegation and must still decode.
        let raw = RawVesting {
            base: RawBase {
                address: Some([0x66; ADDRESS_LENGTH]),
                pub_key: None,
                coins: raw_stake(40),
                account_number: 1,
                sequence: 0,
            },
            schedule: RawSchedule::Delayed {
                original_vesting: raw_stake(100),
                end_time: 10,
            },
            delegated_free: Vec::new(),
            delegated_vesting: raw_stake(60),
        };
        let bytes = encode_frame(VESTING_ACCOUNT_TAG, &raw).unwrap();
        let decoded = VestingAccount::decode(&bytes).unwrap();
        assert_eq!(decoded.coins().to_string(), "40stake");
        assert_eq!(decoded.delegated_vesting().to_string(), "60stake");
    }

    #[test]
    fn non_canonical_coins_rejected() {
        // Coins out of order.
        let raw = RawBase {
            address: None,
            pub_key: None,
            coins: vec![
                RawCoin { denom: "eth", amount: vec![1] },
                RawCoin { denom: "atom", amount: vec![1] },
            ],
            account_number: 0,
            sequence: 0,
        };
        let bytes = encode_frame(BASE_ACCOUNT_TAG, &raw).unwrap();
        let err = BaseAccount::decode(&bytes).unwrap_err();
        assert!(matches!(err, AuthError::Decode(DecodeError::Malformed(_))));

        // Same layout with canonical coins decodes fine.
        let raw = RawBase {
            coins: vec![
                RawCoin { denom: "atom", amount: vec![1] },
                RawCoin { denom: "eth", amount: vec![1] },
            ],
            ..raw
        };
        let bytes = encode_frame(BASE_ACCOUNT_TAG, &raw).unwrap();
        let decoded = BaseAccount::decode(&bytes).unwrap();
        assert_eq!(decoded.coins().to_string(), "1atom,1eth");
    }

    #[test]
    fn byte_flips_never_panic() {
        let bytes = sample_vesting().encode().unwrap();
        for i in 0..bytes.len() {
            let mut corrupted = bytes.clone();
            corrupted[i] ^= 0xFF;
            let _ = AnyAccount::decode(&corrupted);
        }
    }
}
