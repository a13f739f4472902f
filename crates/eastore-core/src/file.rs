//! File-level composition of the pipeline.
//!
//! Encryption derives the key and IV from a signature and transforms the
//! file contents. Decryption either replays that derivation from the same
//! signature or takes the previously derived key directly, which is how a
//! holder of the logged hex key decrypts without re-signing.

use std::fs;
use std::path::Path;

use crate::cipher;
use crate::kdf::{self, DerivedKey};
use crate::EastoreError;

/// Encrypt the file at `path` with a key derived from `signature`.
///
/// Returns the base64 payload together with the hex form of the derived
/// key, so the caller can surface the key for later direct decryption.
pub fn encrypt_file(path: &Path, signature: &[u8]) -> Result<(Vec<u8>, String), EastoreError> {
    let data = fs::read(path).map_err(|source| EastoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    encrypt_bytes(&data, signature)
}

/// Encrypt in-memory content with a signature-derived key.
pub fn encrypt_bytes(data: &[u8], signature: &[u8]) -> Result<(Vec<u8>, String), EastoreError> {
    let key = kdf::derive_key(signature);
    let iv = kdf::derive_iv(&key);
    let payload = cipher::encrypt(data, key.as_bytes(), &iv)?;
    Ok((payload, key.to_hex()))
}

/// Decrypt a payload with a previously derived key given as hex
/// (optionally `0x`-prefixed).
pub fn decrypt_with_key(input: &[u8], hex_key: &str) -> Result<Vec<u8>, EastoreError> {
    let key = DerivedKey::from_hex(hex_key)?;
    cipher::decrypt(input, key.as_bytes())
}

/// Decrypt a payload by replaying the key derivation from the original
/// signature.
pub fn decrypt_with_signature(input: &[u8], signature: &[u8]) -> Result<Vec<u8>, EastoreError> {
    let key = kdf::derive_key(signature);
    cipher::decrypt(input, key.as_bytes())
}
