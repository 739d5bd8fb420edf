//! 32-byte identifiers for transactions and blocks.
//!
//! Both are displayed, parsed and serialized as lowercase hex in the same byte
//! order the ledger's RPC interface prints them. The raw bytes returned by
//! `as_bytes` are in that display order, which is also the order the vote
//! protocol hashes and embeds them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

macro_rules! hash32 {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Build from a byte slice that must be exactly 32 bytes long.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| TypesError::InvalidLength {
                    expected: 32,
                    actual: bytes.len(),
                })?;
                Ok(Self(arr))
            }

            /// Parse a 64-character hex string.
            pub fn from_hex(s: &str) -> Result<Self, TypesError> {
                let bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
                Self::from_slice(&bytes)
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

hash32!(
    /// A transaction identifier. Deck ids and vote ids are transaction ids too:
    /// a deck is identified by its spawn transaction, a vote by its init transaction.
    TxId
);

hash32!(
    /// A block hash as reported by the ledger.
    BlockHash
);
