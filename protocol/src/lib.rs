//! Vote metadata wire format.
//!
//! Vote proposals ([`VoteInitRecord`]) and ballots ([`VoteCastRecord`]) travel
//! as protobuf-compatible bytes in a transaction's data output. Encoding is
//! deterministic: fields are written in tag order and default values are
//! omitted, so independent implementations produce identical bytes.

pub mod codec;
pub mod error;
pub mod version;

pub use codec::{
    check_size, decode_vote_cast, decode_vote_init, encode_vote_cast, encode_vote_init,
    CountMode, VoteCastRecord, VoteInitRecord,
};
pub use error::{DecodeError, EncodeError};
pub use version::PROTOCOL_VERSION;
