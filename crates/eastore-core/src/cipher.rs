//! AES-256-CTR stream transform with base64 transport encoding.
//!
//! Encryption always emits `base64(iv || ciphertext)`. Decryption accepts
//! either that encoding or the raw IV-prefixed bytes: some callers persist
//! the encoded form, some hand the decoded bytes straight back, and there
//! is no external signal saying which. The detector is a character-class
//! heuristic, not a format marker — raw ciphertext that happens to consist
//! only of base64 alphabet characters will be decoded first and the result
//! corrupted. Known limitation, kept as-is.

use aes::Aes256;
use base64::{engine::general_purpose, Engine as _};
use ctr::cipher::{KeyIvInit, StreamCipher};

use crate::kdf::{IV_SIZE, KEY_SIZE};
use crate::EastoreError;

/// Big-endian 128-bit counter mode, matching the usual wallet tooling.
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Encrypt `plaintext` under `key` and `iv`.
///
/// Returns `base64(iv || ciphertext)` as bytes; the ciphertext body has the
/// same length as the plaintext. Fails only when `key` is not 32 bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8; IV_SIZE]) -> Result<Vec<u8>, EastoreError> {
    let mut cipher =
        Aes256Ctr::new_from_slices(key, iv).map_err(|_| EastoreError::InvalidKeyLength(key.len()))?;

    let mut payload = Vec::with_capacity(IV_SIZE + plaintext.len());
    payload.extend_from_slice(iv);
    payload.extend_from_slice(plaintext);
    cipher.apply_keystream(&mut payload[IV_SIZE..]);

    Ok(general_purpose::STANDARD.encode(&payload).into_bytes())
}

/// Decrypt `input` (encoded or raw) under `key`.
///
/// The first 16 raw bytes are taken as the IV, the remainder as ciphertext.
/// Fails when `key` is not 32 bytes, when a payload that matched the base64
/// alphabet does not actually decode, or when fewer than 16 raw bytes are
/// available.
pub fn decrypt(input: &[u8], key: &[u8]) -> Result<Vec<u8>, EastoreError> {
    if key.len() != KEY_SIZE {
        return Err(EastoreError::InvalidKeyLength(key.len()));
    }

    let raw = if is_base64_encoded(input) {
        general_purpose::STANDARD.decode(input)?
    } else {
        input.to_vec()
    };

    if raw.len() < IV_SIZE {
        return Err(EastoreError::TruncatedInput(raw.len()));
    }
    let (iv, body) = raw.split_at(IV_SIZE);

    let mut cipher =
        Aes256Ctr::new_from_slices(key, iv).map_err(|_| EastoreError::InvalidKeyLength(key.len()))?;
    let mut plaintext = body.to_vec();
    cipher.apply_keystream(&mut plaintext);
    Ok(plaintext)
}

/// Structural check for the standard base64 alphabet: a run of alphabet
/// characters followed only by `=` padding. Matches `^[A-Za-z0-9+/]*=*$`.
fn is_base64_encoded(data: &[u8]) -> bool {
    let pad = data.iter().position(|&b| b == b'=').unwrap_or(data.len());
    data[..pad]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
        && data[pad..].iter().all(|&b| b == b'=')
}
