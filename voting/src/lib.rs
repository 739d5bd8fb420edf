//! On-ledger governance voting for decks.
//!
//! A [`VoteInit`] proposal and its ballots are ordinary transactions paying
//! the deck's vote tag address with the record in a data output. This crate
//! builds those transactions ([`builder`]), finds them again on the ledger
//! ([`find_vote_inits`], [`find_vote_casts`]), decides which ballots count
//! ([`ValidityEngine`]) and adds them up ([`tally`]).

pub mod builder;
pub mod config;
pub mod error;
pub mod scanner;
pub mod tally;
pub mod validity;
pub mod vote;

pub use builder::{required_funds, vote_cast, vote_init};
pub use config::{ConfigError, VotingConfig};
pub use error::VotingError;
pub use scanner::{find_vote_casts, find_vote_inits, find_vote_inits_from, ScanCursor};
pub use tally::{tally, tally_vote, Tally};
pub use validity::{
    AnySender, ObservedCast, SeenSenders, SenderEligibility, ValidityEngine,
    DEFAULT_MIN_CONFIRMATIONS,
};
pub use vote::{Vote, VoteInit, VoteStatus};
