//! Fundamental types for PeerVote.
//!
//! This crate defines the value types shared across every other crate in the workspace:
//! transaction and block identifiers, addresses, coin amounts, timestamps, the
//! network parameter table, and the read-only deck reference that votes point at.

pub mod address;
pub mod amount;
pub mod deck;
pub mod error;
pub mod hash;
pub mod network;
pub mod time;

pub use address::Address;
pub use amount::Amount;
pub use deck::Deck;
pub use error::TypesError;
pub use hash::{BlockHash, TxId};
pub use network::Network;
pub use time::Timestamp;
