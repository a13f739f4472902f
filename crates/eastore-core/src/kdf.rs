//! Deterministic key and IV derivation.
//!
//! Both outputs are pure functions of the signature: the key is a straight
//! SHA-256 of the signature bytes, the IV hashes a fixed label together
//! with the key so the two values stay computationally independent even
//! though they share a root secret.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::EastoreError;

/// AES-256 key length.
pub const KEY_SIZE: usize = 32;

/// AES block length, used as the CTR IV length.
pub const IV_SIZE: usize = 16;

/// Domain separation label for IV derivation.
const IV_LABEL: &[u8] = b"IV";

/// Symmetric key derived from a wallet signature. Zeroises memory on drop.
#[derive(Clone, Debug)]
pub struct DerivedKey {
    inner: Zeroizing<[u8; KEY_SIZE]>,
}

impl DerivedKey {
    /// Construct a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self {
            inner: Zeroizing::new(bytes),
        }
    }

    /// Parse a hex-encoded key. A leading `0x` is accepted and stripped.
    /// The decoded material must be exactly 32 bytes.
    pub fn from_hex(hex_key: &str) -> Result<Self, EastoreError> {
        let trimmed = hex_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)?;
        if bytes.len() != KEY_SIZE {
            return Err(EastoreError::InvalidKeyLength(bytes.len()));
        }
        let mut inner = [0u8; KEY_SIZE];
        inner.copy_from_slice(&bytes);
        Ok(Self::from_bytes(inner))
    }

    /// Borrow the raw key material.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.inner
    }

    /// Render the key as lowercase hex for display and later reuse.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner.as_ref())
    }
}

/// Derive the 32-byte symmetric key from a signature: `SHA-256(signature)`.
pub fn derive_key(signature: &[u8]) -> DerivedKey {
    let digest: [u8; KEY_SIZE] = Sha256::digest(signature).into();
    DerivedKey::from_bytes(digest)
}

/// Derive the 16-byte CTR IV from a key: the first half of
/// `SHA-256("IV" || key)`.
pub fn derive_iv(key: &DerivedKey) -> [u8; IV_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(IV_LABEL);
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&digest[..IV_SIZE]);
    iv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let signature = [0x5au8; 65];
        let a = derive_key(&signature);
        let b = derive_key(&signature);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(derive_iv(&a), derive_iv(&b));
    }

    #[test]
    fn key_matches_plain_sha256() {
        let signature = [0x01u8; 65];
        let expected: [u8; 32] = Sha256::digest(signature).into();
        assert_eq!(derive_key(&signature).as_bytes(), &expected);
    }

    #[test]
    fn iv_is_domain_separated_from_key() {
        let key = derive_key(b"some signature");
        let iv = derive_iv(&key);
        assert_eq!(iv.len(), IV_SIZE);
        // IV must not be a plain truncation of the key or its hash.
        assert_ne!(&iv[..], &key.as_bytes()[..IV_SIZE]);
        let rehash: [u8; 32] = Sha256::digest(key.as_bytes()).into();
        assert_ne!(&iv[..], &rehash[..IV_SIZE]);
    }

    #[test]
    fn single_bit_flip_avalanches() {
        let mut signature = [0x01u8; 65];
        let base = *derive_key(&signature).as_bytes();
        signature[0] ^= 0x01;
        let flipped = *derive_key(&signature).as_bytes();

        let distance: u32 = base
            .iter()
            .zip(flipped.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum();
        // Expectation is 128 of 256 bits; accept a generous band.
        assert!((64..=192).contains(&distance), "distance {distance}");
    }

    #[test]
    fn hex_round_trip_and_prefix_stripping() {
        let key = derive_key(&[0x11u8; 65]);
        let plain = DerivedKey::from_hex(&key.to_hex()).expect("plain hex");
        let prefixed = DerivedKey::from_hex(&format!("0x{}", key.to_hex())).expect("0x hex");
        assert_eq!(plain.as_bytes(), key.as_bytes());
        assert_eq!(prefixed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn rejects_wrong_length_keys() {
        for len in [0usize, 16, 31, 33, 64] {
            let hex_key = "ab".repeat(len);
            match DerivedKey::from_hex(&hex_key) {
                Err(EastoreError::InvalidKeyLength(got)) => assert_eq!(got, len),
                other => panic!("expected InvalidKeyLength for {len}, got {other:?}"),
            }
        }
    }
}
