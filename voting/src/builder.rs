//! Unsigned transactions carrying vote metadata.
//!
//! Both record kinds use the same shape:
//!
//! 1. a minimum-fee payment to the deck's vote tag,
//! 2. a data output with the encoded record,
//! 3. change back to the caller (omitted when zero).
//!
//! Signing and broadcasting are left to the wallet.

use peervote_crypto::{decode_address, deck_vote_tag};
use peervote_protocol::{check_size, encode_vote_cast, encode_vote_init};
use peervote_transactions::{SpendableOutput, TransactionError, TxOutput, UnsignedTransaction};
use peervote_types::{Address, Network};

use crate::{VoteInit, VotingError};

/// Transaction announcing `vote` on its deck's tag.
pub fn vote_init(
    vote: &VoteInit,
    inputs: Vec<SpendableOutput>,
    change_address: &Address,
) -> Result<UnsignedTransaction, VotingError> {
    vote.record()
        .validate()
        .map_err(|e| VotingError::InvalidVoteInit(e.to_string()))?;
    let payload = encode_vote_init(vote.record());
    tagged_transaction(vote, payload, inputs, change_address)
}

/// Transaction casting a ballot for `choice_index` on `vote`.
pub fn vote_cast(
    vote: &VoteInit,
    choice_index: u32,
    inputs: Vec<SpendableOutput>,
    change_address: &Address,
) -> Result<UnsignedTransaction, VotingError> {
    let payload = encode_vote_cast(&vote.cast(choice_index)?);
    tagged_transaction(vote, payload, inputs, change_address)
}

/// Total input value a vote transaction on `network` needs.
pub fn required_funds(network: Network) -> peervote_types::Amount {
    network.min_tx_fee() + network.min_tx_fee()
}

fn tagged_transaction(
    vote: &VoteInit,
    payload: Vec<u8>,
    inputs: Vec<SpendableOutput>,
    change_address: &Address,
) -> Result<UnsignedTransaction, VotingError> {
    let network = vote.deck().network;
    check_size(&payload, network.max_data_size())?;
    ensure_on_network(change_address, network)?;

    let tag = deck_vote_tag(vote.deck())?;
    let outputs = vec![
        TxOutput::payment(tag, network.min_tx_fee()),
        TxOutput::Data(payload),
    ];

    UnsignedTransaction::assemble(
        network,
        inputs,
        outputs,
        change_address.clone(),
        network.min_tx_fee(),
    )
    .map_err(|e| match e {
        TransactionError::InsufficientFunds { needed, available } => {
            VotingError::InsufficientFunds { needed, available }
        }
        other => other.into(),
    })
}

fn ensure_on_network(address: &Address, network: Network) -> Result<(), VotingError> {
    let mismatch = || VotingError::AddressNetworkMismatch {
        address: address.to_string(),
        network,
    };
    decode_address(address.as_str())
        .and_then(|payload| payload.ensure_network(network))
        .map(|_| ())
        .map_err(|_| mismatch())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peervote_protocol::{decode_vote_cast, decode_vote_init};
    use peervote_types::{Amount, Deck, TxId};
    use std::sync::Arc;

    const DECK_ID: &str = "7ee8026f5292f4953b741cc3259e1c66742a095e038642e09d6f22c2438b4467";
    const TAG: &str = "mnf15EaSYJg7BWmQki8ah2utVcSkhsWvo6";
    const CHANGE: &str = "msnHPXDWuJhRBPVNQnwXdKvEMQHLr9z1P5";

    fn vote() -> VoteInit {
        let deck = Arc::new(Deck::new(
            DECK_ID.parse().unwrap(),
            Network::PeercoinTestnet,
        ));
        VoteInit::simple(
            deck,
            TxId::new([0x11; 32]),
            "my test vote",
            361465,
            362465,
            &["no", "yes", "maybe"],
        )
        .unwrap()
    }

    fn coin(value: u64) -> SpendableOutput {
        SpendableOutput {
            txid: TxId::new([0x22; 32]),
            vout: 0,
            value: Amount::new(value),
            address: Address::from(CHANGE),
            confirmations: 10,
        }
    }

    #[test]
    fn init_transaction_shape() {
        let tx = vote_init(&vote(), vec![coin(1_000_000)], &Address::from(CHANGE)).unwrap();
        assert_eq!(tx.outputs.len(), 3);
        assert_eq!(
            tx.outputs[0],
            TxOutput::payment(Address::from(TAG), Amount::new(10_000))
        );
        let record = decode_vote_init(tx.data().unwrap()).unwrap();
        assert_eq!(&record, vote().record());
        assert_eq!(
            tx.outputs[2],
            TxOutput::payment(Address::from(CHANGE), Amount::new(980_000))
        );
        assert_eq!(tx.fee(), Amount::new(10_000));
    }

    #[test]
    fn exact_funds_leave_no_change() {
        let tx = vote_init(&vote(), vec![coin(20_000)], &Address::from(CHANGE)).unwrap();
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.total_in(), required_funds(Network::PeercoinTestnet));
    }

    #[test]
    fn cast_references_vote_id() {
        let v = vote();
        let tx = vote_cast(&v, 2, vec![coin(50_000)], &Address::from(CHANGE)).unwrap();
        let record = decode_vote_cast(tx.data().unwrap()).unwrap();
        assert_eq!(record.vote_init_id, v.id());
        assert_eq!(record.choice_index, 2);
        assert_eq!(tx.outputs[0].value(), Amount::new(10_000));
    }

    #[test]
    fn out_of_range_choice_rejected() {
        let result = vote_cast(&vote(), 3, vec![coin(50_000)], &Address::from(CHANGE));
        assert!(matches!(
            result,
            Err(VotingError::InvalidChoice {
                index: 3,
                choices: 3
            })
        ));
    }

    #[test]
    fn underfunded_inputs_rejected() {
        let result = vote_init(&vote(), vec![coin(15_000)], &Address::from(CHANGE));
        match result {
            Err(VotingError::InsufficientFunds { needed, available }) => {
                assert_eq!(needed, Amount::new(20_000));
                assert_eq!(available, Amount::new(15_000));
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
    }

    #[test]
    fn change_address_must_match_network() {
        let mainnet_change = Address::from("PFjDw9tJnCj3PExZPDUjY1fqFN1vtt8CUj");
        assert!(matches!(
            vote_init(&vote(), vec![coin(1_000_000)], &mainnet_change),
            Err(VotingError::AddressNetworkMismatch { .. })
        ));
        assert!(matches!(
            vote_init(&vote(), vec![coin(1_000_000)], &Address::from("not-an-address")),
            Err(VotingError::AddressNetworkMismatch { .. })
        ));
    }

    #[test]
    fn oversized_init_rejected() {
        let v = vote();
        let mut record = v.record().clone();
        record.description = "x".repeat(100);
        let big = VoteInit::new(v.deck().clone(), v.id(), record).unwrap();
        assert!(matches!(
            vote_init(&big, vec![coin(1_000_000)], &Address::from(CHANGE)),
            Err(VotingError::Encode(_))
        ));
    }

    #[test]
    fn mainnet_deck_pays_mainnet_tag() {
        let v = vote();
        let deck = Arc::new(v.deck().on_network(Network::Peercoin));
        let mainnet = VoteInit::new(deck, v.id(), v.record().clone()).unwrap();
        let change = peervote_crypto::encode_address(Network::Peercoin, &[5u8; 20]);
        let tx = vote_init(&mainnet, vec![coin(1_000_000)], &change).unwrap();
        assert_eq!(
            tx.outputs[0],
            TxOutput::payment(
                Address::from("PFjDw9tJnCj3PExZPDUjY1fqFN1vtt8CUj"),
                Amount::new(10_000)
            )
        );
        assert_eq!(tx.network, Network::Peercoin);
    }
}
