//! Storage deal proposal types and epoch arithmetic.
//!
//! These mirror the on-chain ABI structs the eastore contract accepts. The
//! data-prep (CAR/piece) service and the RPC submission are external
//! collaborators: their outputs come in as flags and the assembled proposal
//! goes out as JSON for the caller to submit.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Default deal duration in epochs.
pub const DEFAULT_DURATION: i64 = 518_400;

/// Default start-epoch offset over the current chain head.
pub const DEFAULT_START_EPOCH_OFFSET: i64 = 1_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealRequest {
    pub piece_cid: String,
    pub piece_size: u64,
    pub verified_deal: bool,
    /// Payload CID of the prepared data, carried as the deal label.
    pub label: String,
    pub start_epoch: i64,
    pub end_epoch: i64,
    /// attoFIL per epoch per GiB.
    pub storage_price_per_epoch: u128,
    pub provider_collateral: u128,
    pub client_collateral: u128,
    pub extra_params_version: u64,
    pub extra_params: ExtraParamsV1,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtraParamsV1 {
    /// Retrieval URL for the prepared CAR data.
    pub location_ref: String,
    pub car_size: u64,
    pub skip_ipni_announce: bool,
    pub remove_unsealed_copy: bool,
}

/// Resolve the deal start epoch: an explicit epoch wins, otherwise the
/// offset is applied to the supplied chain head.
pub fn resolve_start_epoch(
    explicit: Option<i64>,
    chain_head: Option<i64>,
    offset: i64,
) -> Result<i64> {
    match (explicit, chain_head) {
        (Some(epoch), _) => Ok(epoch),
        (None, Some(head)) => Ok(head + offset),
        (None, None) => Err(anyhow!(
            "no start epoch: pass --start-epoch, or --chain-head to apply the offset"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_start_epoch_wins() {
        let epoch = resolve_start_epoch(Some(7_000), Some(100), 1_000).expect("epoch");
        assert_eq!(epoch, 7_000);
    }

    #[test]
    fn offset_applies_to_chain_head() {
        let epoch = resolve_start_epoch(None, Some(4_200), DEFAULT_START_EPOCH_OFFSET)
            .expect("epoch");
        assert_eq!(epoch, 5_200);
    }

    #[test]
    fn missing_head_and_epoch_is_an_error() {
        assert!(resolve_start_epoch(None, None, 1_000).is_err());
    }

    #[test]
    fn proposal_serializes_with_stable_field_names() {
        let request = DealRequest {
            piece_cid: "baga6ea4seaqtest".into(),
            piece_size: 2048,
            verified_deal: true,
            label: "bafkreilabel".into(),
            start_epoch: 5_200,
            end_epoch: 5_200 + DEFAULT_DURATION,
            storage_price_per_epoch: 0,
            provider_collateral: 0,
            client_collateral: 0,
            extra_params_version: 1,
            extra_params: ExtraParamsV1 {
                location_ref: "https://buffer.example/car/123".into(),
                car_size: 4096,
                skip_ipni_announce: false,
                remove_unsealed_copy: false,
            },
        };

        let json = serde_json::to_value(&request).expect("json");
        assert_eq!(json["piece_cid"], "baga6ea4seaqtest");
        assert_eq!(json["extra_params"]["car_size"], 4096);
        assert_eq!(json["end_epoch"], 523_600);

        let back: DealRequest = serde_json::from_value(json).expect("parse");
        assert_eq!(back, request);
    }
}
