//! Unsigned ledger transactions.
//!
//! A vote record travels inside an ordinary value transfer: a marker payment to
//! the deck's tag address, one data output with the encoded record, and change.
//! This crate models that transaction before signing and checks its
//! structure. Signing and broadcast happen elsewhere.

pub mod error;
pub mod input;
pub mod output;
pub mod validation;

pub use error::TransactionError;
pub use input::{select_inputs, SpendableOutput};
pub use output::TxOutput;
pub use validation::validate_transaction;

use peervote_types::{Address, Amount, Network};
use serde::{Deserialize, Serialize};

/// A transaction that has been assembled but not signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub network: Network,
    pub inputs: Vec<SpendableOutput>,
    pub outputs: Vec<TxOutput>,
}

impl UnsignedTransaction {
    /// Fund `outputs` from `inputs`, paying `fee` and returning the rest to
    /// `change_address`.
    ///
    /// The change output is appended last and omitted when change is zero.
    /// The result passes [`validate_transaction`].
    pub fn assemble(
        network: Network,
        inputs: Vec<SpendableOutput>,
        mut outputs: Vec<TxOutput>,
        change_address: Address,
        fee: Amount,
    ) -> Result<Self, TransactionError> {
        let total_in = sum(inputs.iter().map(|i| i.value))?;
        let total_out = sum(outputs.iter().map(TxOutput::value))?;
        let needed = total_out.checked_add(fee).ok_or(TransactionError::Overflow)?;

        let change = total_in
            .checked_sub(needed)
            .ok_or(TransactionError::InsufficientFunds {
                needed,
                available: total_in,
            })?;
        if !change.is_zero() {
            outputs.push(TxOutput::payment(change_address, change));
        }

        let tx = Self {
            network,
            inputs,
            outputs,
        };
        validate_transaction(&tx)?;
        tracing::debug!(
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            %change,
            "assembled unsigned transaction"
        );
        Ok(tx)
    }

    pub fn total_in(&self) -> Amount {
        self.inputs.iter().map(|i| i.value).sum()
    }

    pub fn total_out(&self) -> Amount {
        self.outputs.iter().map(TxOutput::value).sum()
    }

    /// Inputs minus outputs.
    pub fn fee(&self) -> Amount {
        self.total_in().saturating_sub(self.total_out())
    }

    /// Payload of the data output, if any.
    pub fn data(&self) -> Option<&[u8]> {
        self.outputs.iter().find_map(TxOutput::data)
    }
}

fn sum(mut amounts: impl Iterator<Item = Amount>) -> Result<Amount, TransactionError> {
    amounts.try_fold(Amount::ZERO, |acc, a| {
        acc.checked_add(a).ok_or(TransactionError::Overflow)
    })
}
