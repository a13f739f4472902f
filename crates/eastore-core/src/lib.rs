//! Core primitives for the eastore toolchain.
//!
//! This crate exposes the building blocks the CLI composes into the
//! encrypt/decrypt workflow:
//!
//! * [`cid`] — content identifier computation over a balanced UnixFS-style
//!   hash DAG.
//! * [`kdf`] — deterministic key and IV derivation from a wallet signature.
//! * [`cipher`] — the AES-256-CTR stream transform with base64 transport
//!   encoding and encoding auto-detection on the decrypt path.
//! * [`signing`] — Ethereum personal-message signing over the identifier
//!   string.
//! * [`file`] — file-level composition of the above.
//!
//! Key and IV are pure functions of the signature, with no per-call salt or
//! randomness. That is what lets an encryptor and a decryptor re-derive the
//! same key independently: both only need the file's content identifier and
//! a signature from the same wallet key. The flip side is a standard
//! CTR-mode caveat — re-encrypting different plaintexts under one signature
//! reuses the keystream, so a signature must never cover more than one
//! logical payload.

pub mod cid;
pub mod cipher;
pub mod file;
pub mod kdf;
pub mod signing;

mod error;

pub use ::cid::Cid;
pub use error::EastoreError;
