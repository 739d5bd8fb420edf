use peervote_types::{Amount, Network};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("decode error: {0}")]
    Decode(#[from] peervote_protocol::DecodeError),

    #[error("encode error: {0}")]
    Encode(#[from] peervote_protocol::EncodeError),

    #[error("crypto error: {0}")]
    Crypto(#[from] peervote_crypto::CryptoError),

    #[error("transaction error: {0}")]
    Transaction(#[from] peervote_transactions::TransactionError),

    #[error("provider error: {0}")]
    Provider(#[from] peervote_provider::ProviderError),

    #[error("invalid vote init: {0}")]
    InvalidVoteInit(String),

    #[error("choice index {index} out of range for {choices} choices")]
    InvalidChoice { index: u32, choices: usize },

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("address {address} is not valid on {network}")]
    AddressNetworkMismatch { address: String, network: Network },

    #[error("count mode {0} cannot be tallied yet")]
    UnsupportedCountMode(&'static str),

    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
