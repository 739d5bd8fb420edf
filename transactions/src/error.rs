use peervote_types::Amount;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("payment output {index} has zero value")]
    ZeroAmount { index: usize },

    #[error("transaction has {0} data outputs, at most one allowed")]
    MultipleDataOutputs(usize),

    #[error("data output too large: {size} > {max} bytes")]
    DataTooLarge { size: usize, max: usize },

    #[error("input {txid}:{vout} spent twice")]
    DuplicateInput { txid: String, vout: u32 },

    #[error("transaction has no inputs")]
    NoInputs,

    #[error("amount overflow")]
    Overflow,
}
