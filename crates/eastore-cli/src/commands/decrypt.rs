use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use eastore_core::file;

#[derive(Args)]
pub struct DecryptArgs {
    /// Input encrypted file path
    #[arg(long, env = "INPUT_PATH")]
    pub input: PathBuf,

    /// Output directory for decrypted files
    #[arg(long, env = "OUT_DIR", default_value = "./decrypted")]
    pub out_dir: PathBuf,

    /// Hex-encoded derived key for decryption (0x prefix allowed)
    #[arg(long, env = "DECRYPT_KEY", hide_env_values = true)]
    pub key: String,
}

pub fn run(args: DecryptArgs) -> Result<()> {
    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.out_dir.display()
        )
    })?;

    let payload = fs::read(&args.input)
        .with_context(|| format!("failed to read encrypted file {}", args.input.display()))?;

    let plaintext =
        file::decrypt_with_key(&payload, &args.key).context("failed to decrypt data")?;

    let out_path = args.out_dir.join(super::prefixed_name("decrypted_", &args.input));
    fs::write(&out_path, &plaintext)
        .with_context(|| format!("failed to write decrypted file {}", out_path.display()))?;

    println!("File decrypted successfully");
    println!("Encrypted file: {}", args.input.display());
    println!("Decrypted file: {}", out_path.display());
    Ok(())
}
