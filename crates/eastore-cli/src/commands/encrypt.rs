use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use eastore_core::{cid, file, signing};

#[derive(Args)]
pub struct EncryptArgs {
    /// Input file path
    #[arg(long, env = "INPUT_PATH")]
    pub input: PathBuf,

    /// Output directory for encrypted files
    #[arg(long, env = "OUT_DIR", default_value = "./encrypted")]
    pub out_dir: PathBuf,
}

pub fn run(args: EncryptArgs, private_key: Option<&str>) -> Result<()> {
    let private_key = super::require_private_key(private_key)?;

    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.out_dir.display()
        )
    })?;

    let file_cid = cid::compute_identifier(&args.input).context("failed to calculate file CID")?;
    let cid_str = file_cid.to_string();

    let signature = signing::sign_message(private_key, &cid_str)
        .context("failed to sign message for encryption")?;

    let (payload, hex_key) =
        file::encrypt_file(&args.input, signature.as_bytes()).context("failed to encrypt data")?;

    let out_path = args.out_dir.join(super::prefixed_name("encrypted_", &args.input));
    fs::write(&out_path, &payload)
        .with_context(|| format!("failed to write encrypted file {}", out_path.display()))?;

    println!("File encrypted successfully");
    println!("Original file: {}", args.input.display());
    println!("File CID: {cid_str}");
    println!("Derived key: {hex_key}");
    println!("Encrypted file: {}", out_path.display());
    Ok(())
}
