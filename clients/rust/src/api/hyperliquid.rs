//! HyperCore info API client.
//!
//! Provides account-existence lookups (`userRole`) and market-order
//! simulation by walking the spot `l2Book`.

use std::{collections::HashMap, str::FromStr};

use alloy::primitives::U256;
use async_trait::async_trait;
use bridge_quote_core::{ChainAddress, ChainId, Token};
use serde::Deserialize;
use serde_json::json;

use super::{AccountActivationLookup, MarketSimulator};
use crate::{config::MarketEntry, constants::HYPERLIQUID_API_URL, errors::BridgeError};

#[derive(Debug, Deserialize)]
struct UserRole {
    role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel {
    pub px: String,
    pub sz: String,
}

#[derive(Debug, Deserialize)]
struct L2Book {
    /// `[bids, asks]`
    levels: (Vec<BookLevel>, Vec<BookLevel>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    /// Spend the quote asset on the asks
    Buy,
    /// Sell the base asset into the bids
    Sell,
}

#[derive(Debug, Clone)]
pub struct HyperliquidInfoClient {
    http: reqwest::Client,
    base_url: String,
    /// Token symbol (upper case) -> spot coin
    markets: HashMap<String, String>,
}

impl HyperliquidInfoClient {
    pub fn new(base_url: impl Into<String>, markets: impl IntoIterator<Item = MarketEntry>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            markets: markets
                .into_iter()
                .map(|m| (m.symbol.to_ascii_uppercase(), m.coin))
                .collect(),
        }
    }

    pub fn mainnet(markets: impl IntoIterator<Item = MarketEntry>) -> Self {
        Self::new(HYPERLIQUID_API_URL, markets)
    }

    async fn info<T: serde::de::DeserializeOwned>(&self, body: serde_json::Value) -> Result<T, BridgeError> {
        Ok(self
            .http
            .post(format!("{}/info", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    fn market_for(&self, token_in: &Token, token_out: &Token) -> Result<(&str, OrderSide), BridgeError> {
        if let Some(coin) = self.markets.get(&token_out.symbol.to_ascii_uppercase()) {
            return Ok((coin, OrderSide::Buy));
        }
        if let Some(coin) = self.markets.get(&token_in.symbol.to_ascii_uppercase()) {
            return Ok((coin, OrderSide::Sell));
        }
        Err(BridgeError::config_not_found(format!(
            "market for {} -> {}",
            token_in.symbol, token_out.symbol
        )))
    }
}

#[async_trait]
impl AccountActivationLookup for HyperliquidInfoClient {
    async fn account_exists(&self, chain_id: ChainId, account: &ChainAddress) -> Result<bool, BridgeError> {
        let user = account.as_evm()?;
        let role: UserRole = self
            .info(json!({ "type": "userRole", "user": user.to_string() }))
            .await?;
        tracing::debug!(chain_id, %user, role = %role.role, "HyperCore account role");
        Ok(role.role != "missing")
    }
}

#[async_trait]
impl MarketSimulator for HyperliquidInfoClient {
    async fn simulate_market_order(
        &self,
        token_in: &Token,
        token_out: &Token,
        amount_in: U256,
    ) -> Result<U256, BridgeError> {
        let (coin, side) = self.market_for(token_in, token_out)?;
        let book: L2Book = self.info(json!({ "type": "l2Book", "coin": coin })).await?;
        let levels = match side {
            OrderSide::Buy => &book.levels.1,
            OrderSide::Sell => &book.levels.0,
        };
        walk_book(levels, side, amount_in, token_in.decimals, token_out.decimals)
    }
}

/// Parse a decimal string into an integer scaled by `10^decimals`,
/// truncating extra fractional digits.
fn parse_scaled(value: &str, decimals: u8) -> Result<U256, BridgeError> {
    let invalid = || BridgeError::upstream("hyperliquid", anyhow::anyhow!("invalid decimal '{value}'"));
    let (int, frac) = value.split_once('.').unwrap_or((value, ""));
    if int.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    let mut frac: String = frac.chars().take(decimals as usize).collect();
    while frac.len() < decimals as usize {
        frac.push('0');
    }
    let digits = format!("{int}{frac}");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    U256::from_str(&digits).map_err(|_| invalid())
}

fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Fill `amount_in` against book levels, best price first.
pub fn walk_book(
    levels: &[BookLevel],
    side: OrderSide,
    amount_in: U256,
    in_decimals: u8,
    out_decimals: u8,
) -> Result<U256, BridgeError> {
    let mut remaining = amount_in;
    let mut output = U256::ZERO;

    for level in levels {
        if remaining.is_zero() {
            break;
        }
        match side {
            OrderSide::Buy => {
                // px in quote (input) units per whole base token
                let px = parse_scaled(&level.px, in_decimals)?;
                let size = parse_scaled(&level.sz, out_decimals)?;
                if px.is_zero() {
                    continue;
                }
                let cost = size * px / pow10(out_decimals);
                if remaining >= cost {
                    output += size;
                    remaining -= cost;
                } else {
                    output += remaining * pow10(out_decimals) / px;
                    remaining = U256::ZERO;
                }
            }
            OrderSide::Sell => {
                let px = parse_scaled(&level.px, out_decimals)?;
                let size = parse_scaled(&level.sz, in_decimals)?;
                let take = remaining.min(size);
                output += take * px / pow10(in_decimals);
                remaining -= take;
            }
        }
    }

    if !remaining.is_zero() {
        return Err(BridgeError::upstream(
            "hyperliquid",
            anyhow::anyhow!("order book too thin for {amount_in}"),
        ));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(px: &str, sz: &str) -> BookLevel {
        BookLevel {
            px: px.to_string(),
            sz: sz.to_string(),
        }
    }

    #[test]
    fn test_parse_scaled() {
        assert_eq!(parse_scaled("1.0002", 6).unwrap(), U256::from(1_000_200u64));
        assert_eq!(parse_scaled("12", 2).unwrap(), U256::from(1_200u64));
        assert_eq!(parse_scaled("0.123456789", 6).unwrap(), U256::from(123_456u64));
        assert!(parse_scaled("1.2.3", 6).is_err());
        assert!(parse_scaled("", 6).is_err());
        assert!(parse_scaled(".", 6).is_err());
        assert!(parse_scaled("", 0).is_err());
        assert_eq!(parse_scaled(".5", 2).unwrap(), U256::from(50u64));
    }

    #[test]
    fn test_buy_walks_asks() {
        // 100 units at 1.0, then 100 at 1.01
        let asks = [level("1.0", "100"), level("1.01", "100")];
        let out = walk_book(&asks, OrderSide::Buy, U256::from(150_000_000u64), 6, 8).unwrap();
        // 100 base for 100 quote, then 50 quote / 1.01
        let expected = U256::from(100u64) * pow10(8) + U256::from(50_000_000u64) * pow10(8) / U256::from(1_010_000u64);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_sell_walks_bids() {
        let bids = [level("0.999", "10"), level("0.99", "10")];
        let out = walk_book(&bids, OrderSide::Sell, U256::from(15_000_000u64), 6, 6).unwrap();
        assert_eq!(out, U256::from(9_990_000u64 + 4_950_000u64));
    }

    #[test]
    fn test_malformed_price_is_rejected() {
        let bids = [level("", "10")];
        let err = walk_book(&bids, OrderSide::Sell, U256::from(1_000_000u64), 6, 6).unwrap_err();
        assert!(matches!(err, BridgeError::Upstream { .. }));
    }

    #[test]
    fn test_thin_book() {
        let asks = [level("1.0", "1")];
        assert!(walk_book(&asks, OrderSide::Buy, U256::from(5_000_000u64), 6, 6).is_err());
    }

    #[test]
    fn test_l2_book_shape() {
        let book: L2Book = serde_json::from_str(
            r#"{"coin":"@166","time":1,"levels":[[{"px":"0.9998","sz":"10.0","n":1}],[{"px":"1.0001","sz":"5.0","n":2}]]}"#,
        )
        .unwrap();
        assert_eq!(book.levels.0[0].px, "0.9998");
        assert_eq!(book.levels.1[0].sz, "5.0");
    }
}
