//! Transaction outputs.

use peervote_types::{Address, Amount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxOutput {
    /// Value paid to an address.
    Payment { address: Address, value: Amount },
    /// Unspendable output carrying protocol bytes (OP_RETURN).
    Data(Vec<u8>),
}

impl TxOutput {
    pub fn payment(address: Address, value: Amount) -> Self {
        Self::Payment { address, value }
    }

    /// Value carried by this output; data outputs carry none.
    pub fn value(&self) -> Amount {
        match self {
            Self::Payment { value, .. } => *value,
            Self::Data(_) => Amount::ZERO,
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Self::Data(bytes) => Some(bytes),
            Self::Payment { .. } => None,
        }
    }
}
