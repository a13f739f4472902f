use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;

use eastore_core::signing;

#[derive(Args)]
pub struct KeygenArgs {
    /// Output directory for the key files
    #[arg(long, env = "OUT_DIR", default_value = "./keys")]
    pub out_dir: PathBuf,
}

pub fn run(args: KeygenArgs) -> Result<()> {
    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.out_dir.display()
        )
    })?;

    // Rejection-sample until the bytes form a valid scalar.
    let key = loop {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        if let Ok(key) = SigningKey::from_slice(&bytes) {
            break key;
        }
    };
    let address = signing::ethereum_address(key.verifying_key());

    fs::write(args.out_dir.join("sk.hex"), hex::encode(key.to_bytes()))
        .context("failed to write sk.hex")?;
    fs::write(args.out_dir.join("address.txt"), &address)
        .context("failed to write address.txt")?;

    println!("keypair written → {}", args.out_dir.display());
    println!("Address: {address}");
    Ok(())
}
