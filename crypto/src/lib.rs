//! Cryptographic primitives for PeerVote.
//!
//! - **SHA-256 / RIPEMD-160** for transaction hashing and pubkey hashes
//! - **secp256k1** for deriving public keys from deterministic secrets
//! - **Base58Check** address encoding with network version bytes
//! - Vote tag derivation: the rendezvous address for a deck's votes

pub mod address;
pub mod base58;
pub mod error;
pub mod hash;
pub mod keys;
pub mod tag;

pub use address::{
    address_from_public_key, decode_address, encode_address, validate_address, AddressPayload,
};
pub use error::CryptoError;
pub use hash::{double_sha256, hash160, sha256, sha256_multi};
pub use keys::compressed_public_key;
pub use tag::{deck_vote_tag, deck_vote_tag_secret, VOTE_TAG_SUFFIX};
