use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use eastore_core::cid;

#[derive(Args)]
pub struct CidArgs {
    /// Input file path
    #[arg(long, env = "INPUT_PATH")]
    pub input: PathBuf,
}

pub fn run(args: CidArgs) -> Result<()> {
    let file_cid =
        cid::compute_identifier(&args.input).context("failed to calculate file CID")?;
    println!("{file_cid}");
    Ok(())
}
