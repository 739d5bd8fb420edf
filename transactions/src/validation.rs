//! Stateless structural validation of unsigned transactions.

use std::collections::HashSet;

use crate::{TransactionError, TxOutput, UnsignedTransaction};

/// Validate a transaction's structure.
///
/// Checks that it spends something, never spends the same outpoint twice,
/// pays no zero-value outputs, and carries at most one data output that fits
/// the network's size ceiling. Whether the inputs exist and are unspent is
/// for the ledger to decide.
pub fn validate_transaction(tx: &UnsignedTransaction) -> Result<(), TransactionError> {
    if tx.inputs.is_empty() {
        return Err(TransactionError::NoInputs);
    }

    let mut seen = HashSet::with_capacity(tx.inputs.len());
    for input in &tx.inputs {
        if !seen.insert((input.txid, input.vout)) {
            return Err(TransactionError::DuplicateInput {
                txid: input.txid.to_string(),
                vout: input.vout,
            });
        }
    }

    let mut data_outputs = 0;
    for (index, output) in tx.outputs.iter().enumerate() {
        match output {
            TxOutput::Payment { value, .. } if value.is_zero() => {
                return Err(TransactionError::ZeroAmount { index });
            }
            TxOutput::Payment { .. } => {}
            TxOutput::Data(bytes) => {
                data_outputs += 1;
                let max = tx.network.max_data_size();
                if bytes.len() > max {
                    return Err(TransactionError::DataTooLarge {
                        size: bytes.len(),
                        max,
                    });
                }
            }
        }
    }
    if data_outputs > 1 {
        return Err(TransactionError::MultipleDataOutputs(data_outputs));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpendableOutput;
    use peervote_types::{Address, Amount, Network, TxId};

    fn input(n: u8, vout: u32) -> SpendableOutput {
        SpendableOutput {
            txid: TxId::new([n; 32]),
            vout,
            value: Amount::new(50_000),
            address: Address::from("msnHPXDWuJhRBPVNQnwXdKvEMQHLr9z1P5"),
            confirmations: 1,
        }
    }

    fn tx(inputs: Vec<SpendableOutput>, outputs: Vec<TxOutput>) -> UnsignedTransaction {
        UnsignedTransaction {
            network: Network::PeercoinTestnet,
            inputs,
            outputs,
        }
    }

    #[test]
    fn well_formed_passes() {
        let t = tx(
            vec![input(1, 0), input(1, 1)],
            vec![
                TxOutput::payment(Address::from("a"), Amount::new(1)),
                TxOutput::Data(vec![0; 80]),
            ],
        );
        assert!(validate_transaction(&t).is_ok());
    }

    #[test]
    fn no_inputs_rejected() {
        assert_eq!(
            validate_transaction(&tx(Vec::new(), Vec::new())),
            Err(TransactionError::NoInputs)
        );
    }

    #[test]
    fn duplicate_input_rejected() {
        let t = tx(vec![input(1, 0), input(1, 0)], Vec::new());
        assert!(matches!(
            validate_transaction(&t),
            Err(TransactionError::DuplicateInput { vout: 0, .. })
        ));
    }

    #[test]
    fn zero_payment_rejected() {
        let t = tx(
            vec![input(1, 0)],
            vec![TxOutput::payment(Address::from("a"), Amount::ZERO)],
        );
        assert_eq!(
            validate_transaction(&t),
            Err(TransactionError::ZeroAmount { index: 0 })
        );
    }

    #[test]
    fn oversized_data_rejected() {
        let t = tx(vec![input(1, 0)], vec![TxOutput::Data(vec![0; 81])]);
        assert_eq!(
            validate_transaction(&t),
            Err(TransactionError::DataTooLarge { size: 81, max: 80 })
        );
    }

    #[test]
    fn two_data_outputs_rejected() {
        let t = tx(
            vec![input(1, 0)],
            vec![TxOutput::Data(vec![1]), TxOutput::Data(vec![2])],
        );
        assert_eq!(
            validate_transaction(&t),
            Err(TransactionError::MultipleDataOutputs(2))
        );
    }
}
