//! Bridge protocols behind one closed dispatch type.

mod cctp;
mod native;
mod sponsored;

pub use cctp::CctpStrategy;
pub use native::NativeIntentStrategy;
pub use sponsored::SponsoredCctpStrategy;

use alloy::primitives::U256;

use crate::{
    errors::{BridgeError, BridgeResult},
    types::{BridgeProvider, BridgeQuote, CrossSwap, Route, SwapAmount, UnsignedTransaction},
};

#[derive(Clone)]
pub enum BridgeStrategy {
    NativeIntent(NativeIntentStrategy),
    Cctp(CctpStrategy),
    CctpSponsored(SponsoredCctpStrategy),
}

impl BridgeStrategy {
    pub fn kind(&self) -> BridgeProvider {
        match self {
            BridgeStrategy::NativeIntent(_) => BridgeProvider::NativeIntent,
            BridgeStrategy::Cctp(_) => BridgeProvider::Cctp,
            BridgeStrategy::CctpSponsored(_) => BridgeProvider::CctpSponsored,
        }
    }

    /// Static eligibility check. Never performs I/O.
    pub fn is_route_supported(&self, route: &Route<'_>) -> bool {
        match self {
            BridgeStrategy::NativeIntent(s) => s.is_route_supported(route),
            BridgeStrategy::Cctp(s) => s.is_route_supported(route),
            BridgeStrategy::CctpSponsored(s) => s.is_route_supported(route),
        }
    }

    fn ensure_supported(&self, swap: &CrossSwap) -> BridgeResult<()> {
        let route = swap.route();
        if !self.is_route_supported(&route) {
            return Err(BridgeError::route_not_supported(format!(
                "{} does not support {route}",
                self.kind()
            )));
        }
        Ok(())
    }

    pub async fn quote_exact_input(&self, swap: &CrossSwap, amount: U256) -> BridgeResult<BridgeQuote> {
        self.ensure_supported(swap)?;
        match self {
            BridgeStrategy::NativeIntent(s) => s.quote_exact_input(swap, amount).await,
            BridgeStrategy::Cctp(s) => s.quote_exact_input(swap, amount).await,
            BridgeStrategy::CctpSponsored(s) => s.quote_exact_input(swap, amount).await,
        }
    }

    pub async fn quote_min_output(&self, swap: &CrossSwap, target: U256) -> BridgeResult<BridgeQuote> {
        self.ensure_supported(swap)?;
        match self {
            BridgeStrategy::NativeIntent(s) => s.quote_min_output(swap, target).await,
            BridgeStrategy::Cctp(s) => s.quote_min_output(swap, target).await,
            BridgeStrategy::CctpSponsored(s) => s.quote_min_output(swap, target).await,
        }
    }

    /// Quote whichever side of the swap the caller fixed.
    pub async fn quote(&self, swap: &CrossSwap) -> BridgeResult<BridgeQuote> {
        match swap.amount {
            SwapAmount::ExactInput(amount) => self.quote_exact_input(swap, amount).await,
            SwapAmount::MinOutput(target) => self.quote_min_output(swap, target).await,
        }
    }

    pub async fn build_transaction(
        &self,
        swap: &CrossSwap,
        quote: &BridgeQuote,
    ) -> BridgeResult<UnsignedTransaction> {
        self.ensure_supported(swap)?;
        if quote.provider != self.kind() {
            return Err(BridgeError::invalid_param(format!(
                "{} quote passed to the {} strategy",
                quote.provider,
                self.kind()
            )));
        }
        match self {
            BridgeStrategy::NativeIntent(s) => s.build_transaction(swap, quote).await,
            BridgeStrategy::Cctp(s) => s.build_transaction(swap, quote).await,
            BridgeStrategy::CctpSponsored(s) => s.build_transaction(swap, quote).await,
        }
    }
}
