//! Circle attestation service (Iris) fee client.

use alloy::primitives::U256;
use async_trait::async_trait;
use bridge_quote_core::CctpFee;
use serde::Deserialize;

use super::CctpFeeSchedule;
use crate::{constants::IRIS_API_URL, errors::BridgeError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForwardFee {
    med: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeeRow {
    finality_threshold: u32,
    /// Basis points, possibly fractional
    minimum_fee: f64,
    #[serde(default)]
    forward_fee: Option<ForwardFee>,
}

/// Fetches CCTP fees from `/v2/burn/USDC/fees/{src}/{dst}`.
#[derive(Debug, Clone)]
pub struct IrisFeeClient {
    http: reqwest::Client,
    base_url: String,
}

impl IrisFeeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn mainnet() -> Self {
        Self::new(IRIS_API_URL)
    }
}

fn select_row(
    rows: Vec<FeeRow>,
    source_domain: u32,
    destination_domain: u32,
    finality_threshold: u32,
) -> Result<CctpFee, BridgeError> {
    let row = rows
        .into_iter()
        .find(|r| r.finality_threshold == finality_threshold)
        .ok_or_else(|| {
            BridgeError::config_not_found(format!(
                "CCTP fee for {source_domain} -> {destination_domain} at finality {finality_threshold}"
            ))
        })?;

    if !row.minimum_fee.is_finite() || row.minimum_fee < 0.0 || row.minimum_fee > 10_000.0 {
        return Err(BridgeError::upstream(
            "iris",
            anyhow::anyhow!("invalid minimum fee {}", row.minimum_fee),
        ));
    }

    Ok(CctpFee {
        // fractional bps round up
        transfer_fee_bps: row.minimum_fee.ceil() as u32,
        forward_fee: U256::from(row.forward_fee.map(|f| f.med).unwrap_or_default()),
    })
}

#[async_trait]
impl CctpFeeSchedule for IrisFeeClient {
    async fn fee_entry(
        &self,
        source_domain: u32,
        destination_domain: u32,
        finality_threshold: u32,
    ) -> Result<CctpFee, BridgeError> {
        let url = format!(
            "{}/v2/burn/USDC/fees/{}/{}?forward=true",
            self.base_url, source_domain, destination_domain
        );
        tracing::debug!(%url, "Fetching CCTP fees");

        let rows: Vec<FeeRow> = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        select_row(rows, source_domain, destination_domain, finality_threshold)
    }
}
