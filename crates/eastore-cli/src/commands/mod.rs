pub mod cid;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod make_deal;

use anyhow::{anyhow, Result};

pub(crate) fn require_private_key(private_key: Option<&str>) -> Result<&str> {
    private_key
        .ok_or_else(|| anyhow!("missing private key: pass --private-key or set PRIVATE_KEY"))
}

/// Output file name convention shared by encrypt and decrypt: prefix the
/// original name, fall back when the path has no usable file name.
pub(crate) fn prefixed_name(prefix: &str, input: &std::path::Path) -> String {
    let base = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("input.bin");
    format!("{prefix}{base}")
}
