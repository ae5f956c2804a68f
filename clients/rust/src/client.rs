//! Main BridgeClient implementation.
//!
//! Owns the shared [`BridgeContext`] and the strategy set, picks the
//! preferred eligible strategy for a request and routes transaction
//! building back to the strategy that produced the quote.

use std::sync::Arc;

use crate::{
    api::{
        AccountActivationLookup, CctpFeeSchedule, MarketSimulator, QuoteSigner, RelayFeeOracle,
        SvmChainReader,
    },
    config::{ConfigError, EngineConfig},
    errors::{BridgeError, BridgeResult},
    strategy::{BridgeStrategy, CctpStrategy, NativeIntentStrategy, SponsoredCctpStrategy},
    types::{BridgeProvider, BridgeQuote, CrossSwap, Route, UnsignedTransaction},
};

/// Immutable configuration plus every collaborator a pipeline may call.
#[derive(Clone)]
pub struct BridgeContext {
    pub config: Arc<EngineConfig>,
    pub fee_schedule: Arc<dyn CctpFeeSchedule>,
    pub accounts: Arc<dyn AccountActivationLookup>,
    pub market: Arc<dyn MarketSimulator>,
    pub relay_fees: Arc<dyn RelayFeeOracle>,
    pub svm: Arc<dyn SvmChainReader>,
    pub signer: Arc<dyn QuoteSigner>,
}

impl BridgeContext {
    pub fn builder() -> BridgeContextBuilder {
        BridgeContextBuilder::new()
    }
}

/// Builder for BridgeContext. Every collaborator is required.
#[derive(Default)]
pub struct BridgeContextBuilder {
    config: Option<Arc<EngineConfig>>,
    fee_schedule: Option<Arc<dyn CctpFeeSchedule>>,
    accounts: Option<Arc<dyn AccountActivationLookup>>,
    market: Option<Arc<dyn MarketSimulator>>,
    relay_fees: Option<Arc<dyn RelayFeeOracle>>,
    svm: Option<Arc<dyn SvmChainReader>>,
    signer: Option<Arc<dyn QuoteSigner>>,
}

impl BridgeContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(Arc::new(config));
        self
    }

    pub fn fee_schedule(mut self, schedule: Arc<dyn CctpFeeSchedule>) -> Self {
        self.fee_schedule = Some(schedule);
        self
    }

    pub fn accounts(mut self, lookup: Arc<dyn AccountActivationLookup>) -> Self {
        self.accounts = Some(lookup);
        self
    }

    pub fn market(mut self, simulator: Arc<dyn MarketSimulator>) -> Self {
        self.market = Some(simulator);
        self
    }

    pub fn relay_fees(mut self, oracle: Arc<dyn RelayFeeOracle>) -> Self {
        self.relay_fees = Some(oracle);
        self
    }

    pub fn svm(mut self, reader: Arc<dyn SvmChainReader>) -> Self {
        self.svm = Some(reader);
        self
    }

    pub fn signer(mut self, signer: Arc<dyn QuoteSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<BridgeContext, ConfigError> {
        Ok(BridgeContext {
            config: self.config.ok_or(ConfigError::MissingField("config"))?,
            fee_schedule: self
                .fee_schedule
                .ok_or(ConfigError::MissingField("fee_schedule"))?,
            accounts: self.accounts.ok_or(ConfigError::MissingField("accounts"))?,
            market: self.market.ok_or(ConfigError::MissingField("market"))?,
            relay_fees: self
                .relay_fees
                .ok_or(ConfigError::MissingField("relay_fees"))?,
            svm: self.svm.ok_or(ConfigError::MissingField("svm"))?,
            signer: self.signer.ok_or(ConfigError::MissingField("signer"))?,
        })
    }
}

/// Entry point for quoting and building bridge deposits.
///
/// # Example
///
/// ```ignore
/// use bridge_quote_client::{BridgeClient, BridgeContext};
///
/// let client = BridgeClient::new(context);
/// let quote = client.quote(&swap).await?;
/// let tx = client.build_transaction(&swap, &quote).await?;
/// ```
#[derive(Clone)]
pub struct BridgeClient {
    ctx: Arc<BridgeContext>,
    /// Preference order: sponsored, plain CCTP, intent.
    strategies: Vec<BridgeStrategy>,
}

impl BridgeClient {
    pub fn new(ctx: BridgeContext) -> Self {
        let ctx = Arc::new(ctx);
        let strategies = vec![
            BridgeStrategy::CctpSponsored(SponsoredCctpStrategy::new(ctx.clone())),
            BridgeStrategy::Cctp(CctpStrategy::new(ctx.clone())),
            BridgeStrategy::NativeIntent(NativeIntentStrategy::new(ctx.clone())),
        ];
        Self { ctx, strategies }
    }

    pub fn context(&self) -> &Arc<BridgeContext> {
        &self.ctx
    }

    pub fn strategies(&self) -> &[BridgeStrategy] {
        &self.strategies
    }

    pub fn strategy(&self, provider: BridgeProvider) -> BridgeResult<&BridgeStrategy> {
        self.strategies
            .iter()
            .find(|s| s.kind() == provider)
            .ok_or_else(|| BridgeError::route_not_supported(format!("{provider} is not enabled")))
    }

    /// Eligible strategies for `route`, most preferred first.
    pub fn strategies_for(&self, route: &Route<'_>) -> Vec<&BridgeStrategy> {
        self.strategies
            .iter()
            .filter(|s| s.is_route_supported(route))
            .collect()
    }

    /// Quote with the preferred eligible strategy.
    pub async fn quote(&self, swap: &CrossSwap) -> BridgeResult<BridgeQuote> {
        let route = swap.route();
        let strategy = self
            .strategies_for(&route)
            .into_iter()
            .next()
            .ok_or_else(|| BridgeError::route_not_supported(route.to_string()))?;

        tracing::debug!(%route, provider = %strategy.kind(), "Selected strategy");
        strategy.quote(swap).await
    }

    /// Build the deposit for a quote previously returned by [`Self::quote`].
    pub async fn build_transaction(
        &self,
        swap: &CrossSwap,
        quote: &BridgeQuote,
    ) -> BridgeResult<UnsignedTransaction> {
        self.strategy(quote.provider)?
            .build_transaction(swap, quote)
            .await
    }
}
