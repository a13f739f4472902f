use std::path::PathBuf;

use thiserror::Error;

/// Canonical error type exposed by the core primitives.
///
/// Nothing in the core retries: every failure is terminal for the current
/// operation and carries enough context for the caller to act.
#[derive(Debug, Error)]
pub enum EastoreError {
    /// File could not be opened or read.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Symmetric key material of the wrong length (must be exactly 32 bytes).
    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Decryption input too short to contain the 16-byte IV prefix.
    #[error("truncated input: {0} bytes, need at least 16 for the IV")]
    TruncatedInput(usize),

    /// Payload matched the base64 alphabet but failed to decode.
    #[error("base64 decode failure: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Malformed hex input (keys, signatures).
    #[error("hex decode failure: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Wallet signing failure (bad private key or signing error).
    #[error("signing failure: {0}")]
    Signing(#[from] k256::ecdsa::Error),
}
