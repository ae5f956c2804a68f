//! Intent relay fee oracle (`/api/suggested-fees`).

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bridge_quote_core::{ChainAddress, Token};
use serde::Deserialize;

use super::{RelayFeeOracle, RelayFeeQuote};
use crate::errors::BridgeError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalRelayFee {
    pct: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Limits {
    min_deposit: String,
    max_deposit: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestedFeesResponse {
    total_relay_fee: TotalRelayFee,
    timestamp: String,
    fill_deadline: String,
    exclusive_relayer: Address,
    exclusivity_deadline: u32,
    #[serde(default)]
    estimated_fill_time_sec: u64,
    limits: Limits,
}

#[derive(Debug, Clone)]
pub struct SuggestedFeesClient {
    http: reqwest::Client,
    base_url: String,
}

impl SuggestedFeesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn field<T: FromStr>(name: &'static str, value: &str) -> Result<T, BridgeError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        BridgeError::upstream("suggested-fees", anyhow::anyhow!("invalid {name} '{value}': {e}"))
    })
}

impl TryFrom<SuggestedFeesResponse> for RelayFeeQuote {
    type Error = BridgeError;

    fn try_from(r: SuggestedFeesResponse) -> Result<Self, Self::Error> {
        Ok(RelayFeeQuote {
            total_relay_fee_pct: field("totalRelayFee.pct", &r.total_relay_fee.pct)?,
            min_deposit: field("limits.minDeposit", &r.limits.min_deposit)?,
            max_deposit: field("limits.maxDeposit", &r.limits.max_deposit)?,
            quote_timestamp: field("timestamp", &r.timestamp)?,
            fill_deadline: field("fillDeadline", &r.fill_deadline)?,
            exclusive_relayer: r.exclusive_relayer,
            exclusivity_deadline: r.exclusivity_deadline,
            estimated_fill_time_sec: r.estimated_fill_time_sec,
        })
    }
}

#[async_trait]
impl RelayFeeOracle for SuggestedFeesClient {
    async fn relay_fees(
        &self,
        input_token: &Token,
        output_token: &Token,
        amount: U256,
        recipient: &ChainAddress,
    ) -> Result<RelayFeeQuote, BridgeError> {
        let query = [
            ("inputToken", input_token.address.to_string()),
            ("outputToken", output_token.address.to_string()),
            ("originChainId", input_token.chain_id.to_string()),
            ("destinationChainId", output_token.chain_id.to_string()),
            ("amount", amount.to_string()),
            ("recipient", recipient.to_string()),
        ];
        let response: SuggestedFeesResponse = self
            .http
            .get(format!("{}/api/suggested-fees", self.base_url))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let response: SuggestedFeesResponse = serde_json::from_str(
            r#"{
                "totalRelayFee": {"pct": "100000000000000", "total": "100"},
                "timestamp": "1700000000",
                "fillDeadline": "1700010800",
                "exclusiveRelayer": "0x0000000000000000000000000000000000000000",
                "exclusivityDeadline": 0,
                "estimatedFillTimeSec": 4,
                "limits": {"minDeposit": "1000", "maxDeposit": "1000000000000", "maxDepositInstant": "1"}
            }"#,
        )
        .unwrap();
        let quote = RelayFeeQuote::try_from(response).unwrap();
        assert_eq!(quote.total_relay_fee_pct, U256::from(100_000_000_000_000u64));
        assert_eq!(quote.quote_timestamp, 1_700_000_000);
        assert_eq!(quote.min_deposit, U256::from(1_000u64));
        assert_eq!(quote.estimated_fill_time_sec, 4);
    }
}
