use anyhow::Result;
use clap::Args;
use serde::Serialize;

use bridge_quote_client::{BridgeQuote, UnsignedTransaction};

use super::{print_json, Environment, SwapArgs};

#[derive(Args, Debug)]
pub struct BuildTxArgs {
    #[command(flatten)]
    pub swap: SwapArgs,
}

#[derive(Serialize)]
struct BuildTxOutput {
    quote: BridgeQuote,
    transaction: UnsignedTransaction,
}

pub async fn execute(env: &Environment, args: BuildTxArgs) -> Result<()> {
    let (swap, quote) = env.quote(&args.swap).await?;
    let transaction = env.client.build_transaction(&swap, &quote).await?;

    tracing::info!(
        provider = %quote.provider,
        chain_id = transaction.chain_id(),
        ecosystem = %transaction.ecosystem(),
        "Deposit transaction built"
    );
    print_json(&BuildTxOutput { quote, transaction })
}
