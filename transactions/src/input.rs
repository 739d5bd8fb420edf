//! Spendable outputs and input selection.

use peervote_types::{Address, Amount, TxId};
use serde::{Deserialize, Serialize};

use crate::TransactionError;

/// An unspent output that can fund a new transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendableOutput {
    pub txid: TxId,
    pub vout: u32,
    pub value: Amount,
    pub address: Address,
    #[serde(default)]
    pub confirmations: u64,
}

/// Pick outputs until their total covers `amount`.
///
/// Outputs with the fewest confirmations are consumed first, keeping older
/// coins untouched. Selection stops as soon as the running total is enough.
pub fn select_inputs(
    mut candidates: Vec<SpendableOutput>,
    amount: Amount,
) -> Result<Vec<SpendableOutput>, TransactionError> {
    candidates.sort_by_key(|o| o.confirmations);

    let mut selected = Vec::new();
    let mut total = Amount::ZERO;
    for output in candidates {
        total = total
            .checked_add(output.value)
            .ok_or(TransactionError::Overflow)?;
        selected.push(output);
        if total >= amount {
            return Ok(selected);
        }
    }

    Err(TransactionError::InsufficientFunds {
        needed: amount,
        available: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(n: u8, value: u64, confirmations: u64) -> SpendableOutput {
        SpendableOutput {
            txid: TxId::new([n; 32]),
            vout: 0,
            value: Amount::new(value),
            address: Address::from("msnHPXDWuJhRBPVNQnwXdKvEMQHLr9z1P5"),
            confirmations,
        }
    }

    #[test]
    fn stops_once_covered() {
        let picked = select_inputs(
            vec![utxo(1, 50, 10), utxo(2, 50, 5), utxo(3, 50, 1)],
            Amount::new(80),
        )
        .unwrap();
        assert_eq!(picked.len(), 2);
        // fewest confirmations first
        assert_eq!(picked[0].txid, TxId::new([3; 32]));
        assert_eq!(picked[1].txid, TxId::new([2; 32]));
    }

    #[test]
    fn exact_amount_is_enough() {
        let picked = select_inputs(vec![utxo(1, 80, 1)], Amount::new(80)).unwrap();
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn insufficient_reports_total() {
        let err = select_inputs(vec![utxo(1, 10, 1), utxo(2, 20, 2)], Amount::new(100)).unwrap_err();
        assert_eq!(
            err,
            TransactionError::InsufficientFunds {
                needed: Amount::new(100),
                available: Amount::new(30)
            }
        );
    }

    #[test]
    fn empty_candidates_insufficient() {
        assert!(matches!(
            select_inputs(Vec::new(), Amount::new(1)),
            Err(TransactionError::InsufficientFunds { .. })
        ));
    }
}
