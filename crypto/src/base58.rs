//! Base58 and Base58Check encoding.
//!
//! Alphabet: `123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz`
//! (no `0`, `O`, `I`, `l`). Leading zero bytes map to leading `1` characters.
//! Base58Check appends the first 4 bytes of double SHA-256 before encoding.

use crate::{double_sha256, CryptoError};

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Reverse lookup table: ASCII byte → digit value (0xFF = invalid).
const BASE58_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE58_ALPHABET;
    let mut i = 0;
    while i < 58 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const CHECKSUM_LEN: usize = 4;

/// Encode bytes as base58.
pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    // Little-endian base58 digits of the big-endian input number.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut result = String::with_capacity(zeros + digits.len());
    result.extend(std::iter::repeat('1').take(zeros));
    result.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    result
}

/// Decode a base58 string.
pub fn decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    let zeros = s.bytes().take_while(|&c| c == b'1').count();

    // Little-endian base256 bytes of the number.
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len() * 733 / 1000 + 1);
    for c in s.chars().skip(zeros) {
        let val = if c.is_ascii() {
            BASE58_DECODE[c as usize]
        } else {
            0xFF
        };
        if val == 0xFF {
            return Err(CryptoError::InvalidBase58Char(c));
        }
        let mut carry = val as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xFF) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut result = vec![0u8; zeros];
    result.extend(bytes.iter().rev());
    Ok(result)
}

/// Encode `payload` with a 4-byte double-SHA-256 checksum appended.
pub fn encode_check(payload: &[u8]) -> String {
    let checksum = double_sha256(payload);
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&data)
}

/// Decode a Base58Check string and verify its checksum, returning the payload.
pub fn decode_check(s: &str) -> Result<Vec<u8>, CryptoError> {
    let mut data = decode(s)?;
    if data.len() < CHECKSUM_LEN {
        return Err(CryptoError::InvalidPayloadLength(data.len()));
    }
    let split = data.len() - CHECKSUM_LEN;
    let expected = double_sha256(&data[..split]);
    if data[split..] != expected[..CHECKSUM_LEN] {
        return Err(CryptoError::ChecksumMismatch);
    }
    data.truncate(split);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_known_vectors() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(encode(&[0, 0, 0x28, 0x7f, 0xb4, 0xcd]), "11233QC4");
    }

    #[test]
    fn decode_known_vectors() {
        assert_eq!(decode("StV1DL6CwTryKyV").unwrap(), b"hello world");
        assert_eq!(decode("11233QC4").unwrap(), vec![0, 0, 0x28, 0x7f, 0xb4, 0xcd]);
    }

    #[test]
    fn invalid_characters_rejected() {
        assert_eq!(decode("0abc"), Err(CryptoError::InvalidBase58Char('0')));
        assert_eq!(decode("abcl"), Err(CryptoError::InvalidBase58Char('l')));
        assert_eq!(decode("ab€"), Err(CryptoError::InvalidBase58Char('€')));
    }

    #[test]
    fn check_roundtrip() {
        let payload = [0x37u8, 1, 2, 3, 4, 5];
        let encoded = encode_check(&payload);
        assert_eq!(decode_check(&encoded).unwrap(), payload);
    }

    #[test]
    fn check_detects_corruption() {
        let encoded = encode_check(&[0x6fu8; 21]);
        let mut corrupted: Vec<char> = encoded.chars().collect();
        let last = corrupted.len() - 1;
        corrupted[last] = if corrupted[last] == '2' { '3' } else { '2' };
        let corrupted: String = corrupted.into_iter().collect();
        assert!(decode_check(&corrupted).is_err());
    }
}
