//! secp256k1 public key derivation.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;

use crate::CryptoError;

/// Length of a SEC1 compressed public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// Derive the SEC1-compressed public key for a 32-byte secret.
///
/// Fails when the secret is zero or not below the curve order.
pub fn compressed_public_key(secret: &[u8; 32]) -> Result<[u8; COMPRESSED_PUBKEY_LEN], CryptoError> {
    let secret_key = SecretKey::from_slice(secret).map_err(|_| CryptoError::InvalidSecret)?;
    let point = secret_key.public_key().to_encoded_point(true);
    let mut out = [0u8; COMPRESSED_PUBKEY_LEN];
    out.copy_from_slice(point.as_bytes());
    Ok(out)
}
