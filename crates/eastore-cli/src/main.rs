use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod deal;

#[derive(Parser)]
#[command(name = "eastore", version, about = "Eastore CLI tool")]
struct Cli {
    /// Private key for signing transactions
    #[arg(long, global = true, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// RPC URL
    #[arg(long, global = true, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Eastore contract address
    #[arg(long, global = true, env = "EASTORE_CONTRACT_ADDRESS")]
    contract: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file using AES with a key derived from a wallet signature
    Encrypt(commands::encrypt::EncryptArgs),
    /// Decrypt a file that was encrypted using the encrypt command
    Decrypt(commands::decrypt::DecryptArgs),
    /// Print the content identifier of a file
    Cid(commands::cid::CidArgs),
    /// Generate a fresh secp256k1 signing key
    Keygen(commands::keygen::KeygenArgs),
    /// Assemble a storage deal proposal from prepared data
    MakeDeal(commands::make_deal::MakeDealArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Encrypt(args) => commands::encrypt::run(args, cli.private_key.as_deref()),
        Commands::Decrypt(args) => commands::decrypt::run(args),
        Commands::Cid(args) => commands::cid::run(args),
        Commands::Keygen(args) => commands::keygen::run(args),
        Commands::MakeDeal(args) => commands::make_deal::run(args, cli.private_key.as_deref()),
    }
}
