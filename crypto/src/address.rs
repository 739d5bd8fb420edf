//! P2PKH address encoding and decoding.
//!
//! Address format: Base58Check(version_byte || RIPEMD-160(SHA-256(pubkey)))
//!
//! The version byte selects the network (`0x37` mainnet, `0x6f` testnet), so
//! the same pubkey hash yields a different string on each network.

use peervote_types::{Address, Network};

use crate::{base58, hash160, CryptoError};

/// Length of version byte + pubkey hash.
const PAYLOAD_LEN: usize = 21;

/// The decoded content of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressPayload {
    pub network: Network,
    pub pubkey_hash: [u8; 20],
}

impl AddressPayload {
    /// Reject the payload unless it belongs to `expected`.
    pub fn ensure_network(self, expected: Network) -> Result<Self, CryptoError> {
        if self.network != expected {
            return Err(CryptoError::NetworkMismatch {
                expected: expected.to_string(),
                actual: self.network.to_string(),
            });
        }
        Ok(self)
    }
}

/// Encode a pubkey hash as an address on `network`.
pub fn encode_address(network: Network, pubkey_hash: &[u8; 20]) -> Address {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = network.p2pkh_version();
    payload[1..].copy_from_slice(pubkey_hash);
    Address::new(base58::encode_check(&payload))
}

/// Derive the address that pays to `public_key` (SEC1 encoded) on `network`.
pub fn address_from_public_key(network: Network, public_key: &[u8]) -> Address {
    encode_address(network, &hash160(public_key))
}

/// Parse an address string, verifying its checksum and version byte.
pub fn decode_address(address: &str) -> Result<AddressPayload, CryptoError> {
    let payload = base58::decode_check(address)?;
    if payload.len() != PAYLOAD_LEN {
        return Err(CryptoError::InvalidPayloadLength(payload.len()));
    }
    let network =
        Network::from_p2pkh_version(payload[0]).ok_or(CryptoError::UnknownVersion(payload[0]))?;
    let mut pubkey_hash = [0u8; 20];
    pubkey_hash.copy_from_slice(&payload[1..]);
    Ok(AddressPayload {
        network,
        pubkey_hash,
    })
}

/// Whether `address` is well-formed and belongs to `network`.
pub fn validate_address(address: &str, network: Network) -> bool {
    decode_address(address)
        .and_then(|p| p.ensure_network(network))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTNET_WALLET: &str = "msnHPXDWuJhRBPVNQnwXdKvEMQHLr9z1P5";

    #[test]
    fn decode_testnet_wallet() {
        let payload = decode_address(TESTNET_WALLET).unwrap();
        assert_eq!(payload.network, Network::PeercoinTestnet);
        assert!(validate_address(TESTNET_WALLET, Network::PeercoinTestnet));
        assert!(!validate_address(TESTNET_WALLET, Network::Peercoin));
    }

    #[test]
    fn encode_decode_roundtrip() {
        let hash = [0xABu8; 20];
        for net in Network::ALL {
            let addr = encode_address(net, &hash);
            let payload = decode_address(addr.as_str()).unwrap();
            assert_eq!(payload.network, net);
            assert_eq!(payload.pubkey_hash, hash);
        }
    }

    #[test]
    fn mainnet_addresses_start_with_p() {
        let addr = encode_address(Network::Peercoin, &[7u8; 20]);
        assert!(addr.as_str().starts_with('P'));
    }

    #[test]
    fn network_mismatch_reported() {
        let err = decode_address(TESTNET_WALLET)
            .unwrap()
            .ensure_network(Network::Peercoin)
            .unwrap_err();
        assert_eq!(
            err,
            CryptoError::NetworkMismatch {
                expected: "ppc".into(),
                actual: "tppc".into()
            }
        );
    }

    #[test]
    fn unknown_version_rejected() {
        let bitcoin_style = base58::encode_check(&[0x00u8; 21]);
        assert_eq!(
            decode_address(&bitcoin_style),
            Err(CryptoError::UnknownVersion(0x00))
        );
    }

    #[test]
    fn wrong_length_rejected() {
        let short = base58::encode_check(&[0x37u8; 10]);
        assert_eq!(
            decode_address(&short),
            Err(CryptoError::InvalidPayloadLength(10))
        );
        assert!(!validate_address("", Network::Peercoin));
    }
}
