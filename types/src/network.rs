//! Network identifier and its immutable parameter table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Amount, TypesError};

/// Identifies which ledger a deck, address or transaction belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Peercoin mainnet.
    #[serde(rename = "ppc")]
    Peercoin,
    /// Peercoin testnet.
    #[serde(rename = "tppc")]
    PeercoinTestnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Peercoin, Network::PeercoinTestnet];

    /// Short ticker-style name used in configs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Peercoin => "ppc",
            Self::PeercoinTestnet => "tppc",
        }
    }

    /// Version byte prefixed to the pubkey hash in P2PKH addresses.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Self::Peercoin => 0x37,
            Self::PeercoinTestnet => 0x6f,
        }
    }

    /// Minimum relay fee, also used as the tag-address marker amount.
    pub fn min_tx_fee(&self) -> Amount {
        Amount::new(10_000)
    }

    /// Largest payload a data output may carry.
    pub fn max_data_size(&self) -> usize {
        80
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::PeercoinTestnet)
    }

    /// Look up a network by its address version byte.
    pub fn from_p2pkh_version(version: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.p2pkh_version() == version)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ppc" | "peercoin" => Ok(Self::Peercoin),
            "tppc" | "peercoin-testnet" => Ok(Self::PeercoinTestnet),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_short_and_long_names() {
        assert_eq!("ppc".parse::<Network>().unwrap(), Network::Peercoin);
        assert_eq!("TPPC".parse::<Network>().unwrap(), Network::PeercoinTestnet);
        assert_eq!(
            "peercoin-testnet".parse::<Network>().unwrap(),
            Network::PeercoinTestnet
        );
        assert!("btc".parse::<Network>().is_err());
    }

    #[test]
    fn version_byte_lookup() {
        for net in Network::ALL {
            assert_eq!(Network::from_p2pkh_version(net.p2pkh_version()), Some(net));
        }
        assert_eq!(Network::from_p2pkh_version(0x00), None);
    }

    #[test]
    fn serde_uses_short_names() {
        let json = serde_json::to_string(&Network::PeercoinTestnet).unwrap();
        assert_eq!(json, "\"tppc\"");
    }
}
