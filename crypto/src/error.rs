use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid base58 character {0:?}")]
    InvalidBase58Char(char),

    #[error("base58check checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid address payload length: {0}")]
    InvalidPayloadLength(usize),

    #[error("unknown address version byte 0x{0:02x}")]
    UnknownVersion(u8),

    #[error("address belongs to {actual}, expected {expected}")]
    NetworkMismatch { expected: String, actual: String },

    #[error("secret is not a valid secp256k1 scalar")]
    InvalidSecret,
}
