//! Ethereum personal-message signing.
//!
//! The encrypt workflow signs the content identifier string with a wallet
//! key; that signature is the root secret everything downstream derives
//! from. Nothing else in the core inspects signatures, so tests can
//! substitute fixed bytes instead of real key material.

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

use crate::EastoreError;

/// Length of a recoverable secp256k1 signature: `r || s || v`.
pub const SIGNATURE_SIZE: usize = 65;

/// Recoverable wallet signature, treated as opaque secret bytes by the
/// rest of the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    /// Borrow the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Parse a hex-encoded secp256k1 private key. A leading `0x` is accepted.
pub fn parse_private_key(private_key_hex: &str) -> Result<SigningKey, EastoreError> {
    let trimmed = private_key_hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits)?;
    Ok(SigningKey::from_slice(&bytes)?)
}

/// Sign `message` the way a wallet does: prefix it with
/// `"\x19Ethereum Signed Message:\n" + length`, hash with Keccak-256, and
/// produce a recoverable ECDSA signature with `v` shifted to the 27/28
/// convention. Deterministic (RFC 6979), so one key and one message always
/// give the same signature.
pub fn sign_message(private_key_hex: &str, message: &str) -> Result<Signature, EastoreError> {
    let key = parse_private_key(private_key_hex)?;
    let digest = personal_message_hash(message);
    let (signature, recovery_id) = key.sign_prehash_recoverable(&digest)?;

    let mut out = [0u8; SIGNATURE_SIZE];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = recovery_id.to_byte() + 27;
    Ok(Signature(out))
}

/// Derive the `0x`-prefixed Ethereum address of a verifying key.
pub fn ethereum_address(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// Keccak-256 of the length-prefixed, domain-tagged message.
fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}
