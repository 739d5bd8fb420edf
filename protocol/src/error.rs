use thiserror::Error;

/// Why a metadata payload could not be read as a vote record.
///
/// Scanners treat every variant as "not a protocol record" and skip the
/// transaction; the variant is kept for logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Truncated buffer, wire-type mismatch, bad varint or invalid UTF-8.
    #[error("malformed metadata: {0}")]
    Malformed(String),

    #[error("unknown count mode: {0}")]
    UnknownCountMode(i32),

    #[error("vote needs at least 2 choices, got {0}")]
    TooFewChoices(usize),

    #[error("choice {0} is empty")]
    EmptyChoice(usize),

    #[error("duplicate choice: {0:?}")]
    DuplicateChoice(String),

    #[error("start block {start} must be below end block {end}")]
    InvalidBlockRange { start: u32, end: u32 },

    #[error("vote init id must be 32 bytes, got {0}")]
    InvalidVoteInitId(usize),
}

impl From<prost::DecodeError> for DecodeError {
    fn from(e: prost::DecodeError) -> Self {
        Self::Malformed(e.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("encoded metadata too large: {size} > {max} bytes")]
    TooLarge { size: usize, max: usize },
}
