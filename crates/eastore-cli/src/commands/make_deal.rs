use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};

use eastore_core::{cid, file, signing, Cid};

use crate::deal::{self, DealRequest, ExtraParamsV1};

#[derive(Args)]
pub struct MakeDealArgs {
    /// Input file path
    #[arg(long, env = "INPUT_PATH")]
    pub input: PathBuf,

    /// Output directory for the assembled proposal
    #[arg(long, env = "OUT_DIR", default_value = "./deal")]
    pub out_dir: PathBuf,

    /// Piece CID reported by the data-prep service
    #[arg(long, env = "PIECE_CID")]
    pub piece_cid: String,

    /// Piece size in bytes reported by the data-prep service
    #[arg(long, env = "PIECE_SIZE")]
    pub piece_size: u64,

    /// CAR file size reported by the data-prep service
    #[arg(long, env = "CAR_SIZE")]
    pub car_size: u64,

    /// Retrieval URL for the prepared CAR data
    #[arg(long, env = "LOCATION_REF")]
    pub location_ref: String,

    /// Duration of the deal in epochs
    #[arg(long, env = "DEAL_DURATION", default_value_t = deal::DEFAULT_DURATION)]
    pub duration: i64,

    /// Start epoch by when the deal should be proved on-chain (overrides offset)
    #[arg(long, env = "DEAL_START_EPOCH")]
    pub start_epoch: Option<i64>,

    /// Start epoch offset over the current chain head
    #[arg(long, env = "DEAL_START_EPOCH_OFFSET", default_value_t = deal::DEFAULT_START_EPOCH_OFFSET)]
    pub start_epoch_offset: i64,

    /// Current chain head epoch, fetched out-of-band
    #[arg(long, env = "CHAIN_HEAD")]
    pub chain_head: Option<i64>,

    /// Storage price in attoFIL per epoch per GiB
    #[arg(long, env = "STORAGE_PRICE", default_value = "0")]
    pub storage_price: String,

    /// Provider collateral in attoFIL
    #[arg(long, env = "PROVIDER_COLLATERAL", default_value = "0")]
    pub provider_collateral: String,

    /// Client collateral in attoFIL
    #[arg(long, env = "CLIENT_COLLATERAL", default_value = "0")]
    pub client_collateral: String,

    /// Do not announce the deal index to the network indexer
    #[arg(long, env = "SKIP_IPNI")]
    pub skip_ipni: bool,

    /// An unsealed copy is not required for fast retrieval
    #[arg(long, env = "REMOVE_UNSEALED")]
    pub remove_unsealed: bool,

    /// Whether the deal funds come from verified client data-cap
    #[arg(long, env = "VERIFIED_DEAL", action = ArgAction::Set, default_value_t = true)]
    pub verified_deal: bool,

    /// Encrypt the file before assembling the deal
    #[arg(long, env = "ENCRYPTED")]
    pub encrypted: bool,

    /// Output directory for the encrypted copy
    #[arg(long, env = "ENCRYPTED_OUT_DIR")]
    pub encrypted_out_dir: Option<PathBuf>,
}

fn parse_atto(value: &str, what: &str) -> Result<u128> {
    value
        .trim()
        .parse::<u128>()
        .with_context(|| format!("invalid {what} format: {value}"))
}

pub fn run(args: MakeDealArgs, private_key: Option<&str>) -> Result<()> {
    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.out_dir.display()
        )
    })?;

    // Validate the externally supplied piece CID early.
    Cid::try_from(args.piece_cid.as_str())
        .with_context(|| format!("invalid piece CID {}", args.piece_cid))?;

    let storage_price = parse_atto(&args.storage_price, "storage price")?;
    let provider_collateral = parse_atto(&args.provider_collateral, "provider collateral")?;
    let client_collateral = parse_atto(&args.client_collateral, "client collateral")?;

    // Optionally encrypt first; the deal then covers the encrypted copy.
    let mut input = args.input.clone();
    if args.encrypted {
        let private_key = super::require_private_key(private_key)?;
        let encrypted_dir = args
            .encrypted_out_dir
            .clone()
            .unwrap_or_else(|| args.out_dir.join("encrypted"));
        fs::create_dir_all(&encrypted_dir).with_context(|| {
            format!(
                "failed to create encrypted output directory {}",
                encrypted_dir.display()
            )
        })?;

        let file_cid = cid::compute_identifier(&input).context("failed to calculate file CID")?;
        let signature = signing::sign_message(private_key, &file_cid.to_string())
            .context("failed to sign message for encryption")?;
        let (payload, hex_key) =
            file::encrypt_file(&input, signature.as_bytes()).context("failed to encrypt file")?;

        let encrypted_path = encrypted_dir.join(super::prefixed_name("encrypted_", &input));
        fs::write(&encrypted_path, &payload).with_context(|| {
            format!("failed to write encrypted file {}", encrypted_path.display())
        })?;

        println!("File encrypted successfully with key: {hex_key}");
        input = encrypted_path;
    }

    // The deal label is the payload CID of the (possibly encrypted) data.
    let payload_cid =
        cid::compute_identifier(&input).context("failed to calculate payload CID")?;

    let start_epoch =
        deal::resolve_start_epoch(args.start_epoch, args.chain_head, args.start_epoch_offset)?;
    let end_epoch = start_epoch + args.duration;

    let request = DealRequest {
        piece_cid: args.piece_cid,
        piece_size: args.piece_size,
        verified_deal: args.verified_deal,
        label: payload_cid.to_string(),
        start_epoch,
        end_epoch,
        storage_price_per_epoch: storage_price,
        provider_collateral,
        client_collateral,
        extra_params_version: 1,
        extra_params: ExtraParamsV1 {
            location_ref: args.location_ref,
            car_size: args.car_size,
            skip_ipni_announce: args.skip_ipni,
            remove_unsealed_copy: args.remove_unsealed,
        },
    };

    let proposal_path = args.out_dir.join("deal_proposal.json");
    let json = serde_json::to_vec_pretty(&request).context("failed to serialize proposal")?;
    fs::write(&proposal_path, json)
        .with_context(|| format!("failed to write {}", proposal_path.display()))?;

    println!("Deal proposal assembled");
    println!("Payload CID: {}", request.label);
    println!("Epochs: {start_epoch} → {end_epoch}");
    println!("Proposal: {}", proposal_path.display());
    Ok(())
}
