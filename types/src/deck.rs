//! Read-only deck reference.
//!
//! A deck is the token-issuance record that votes are attached to. Its full
//! metadata model is owned elsewhere; voting only needs the identity, the
//! declared network and the production flag.

use serde::{Deserialize, Serialize};

use crate::{Network, TxId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck spawn transaction id.
    pub id: TxId,
    pub name: String,
    pub network: Network,
    pub production: bool,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub number_of_decimals: u8,
    /// Raw issue-mode flags as recorded at spawn time.
    #[serde(default)]
    pub issue_mode: u32,
}

impl Deck {
    /// A minimal deck reference: only the fields voting consumes are set.
    pub fn new(id: TxId, network: Network) -> Self {
        Self {
            id,
            name: String::new(),
            network,
            production: true,
            version: 1,
            number_of_decimals: 0,
            issue_mode: 0,
        }
    }

    /// The same deck declared on another network.
    ///
    /// Returns a new value; the original is never mutated, so references held
    /// by existing votes keep pointing at the network they were built for.
    pub fn on_network(&self, network: Network) -> Self {
        Self {
            network,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_network_leaves_original_untouched() {
        let deck = Deck::new(TxId::new([1u8; 32]), Network::Peercoin);
        let testnet = deck.on_network(Network::PeercoinTestnet);
        assert_eq!(deck.network, Network::Peercoin);
        assert_eq!(testnet.network, Network::PeercoinTestnet);
        assert_eq!(deck.id, testnet.id);
    }
}
