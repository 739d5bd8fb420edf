//! Vote tag addresses.
//!
//! Every vote-related transaction for a deck pays a marker amount to one
//! deterministic address, so the ledger's address index doubles as the vote
//! log. The address is the P2PKH address of a secret derived from the deck id:
//!
//! ```text
//! secret  = SHA-256(deck_id || "vote_init")
//! pubkey  = secp256k1(secret), SEC1 compressed
//! address = Base58Check(version(network) || RIPEMD-160(SHA-256(pubkey)))
//! ```
//!
//! The secret is public by construction; the address is a meeting point, not
//! a wallet.

use peervote_types::{Address, Deck, TxId};

use crate::{address_from_public_key, compressed_public_key, sha256_multi, CryptoError};

/// Domain separator appended to the deck id.
pub const VOTE_TAG_SUFFIX: &[u8] = b"vote_init";

/// The deterministic secret behind a deck's vote tag.
pub fn deck_vote_tag_secret(deck_id: &TxId) -> [u8; 32] {
    sha256_multi(&[deck_id.as_bytes(), VOTE_TAG_SUFFIX])
}

/// Derive the vote tag address for `deck` on the deck's declared network.
///
/// Pure: the same deck id and network always produce the same address. The
/// underlying pubkey hash depends only on the deck id.
pub fn deck_vote_tag(deck: &Deck) -> Result<Address, CryptoError> {
    let secret = deck_vote_tag_secret(&deck.id);
    let pubkey = compressed_public_key(&secret)?;
    Ok(address_from_public_key(deck.network, &pubkey))
}
