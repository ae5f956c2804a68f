use anyhow::Result;
use clap::Args;

use super::{print_json, Environment, SwapArgs};

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub swap: SwapArgs,
}

pub async fn execute(env: &Environment, args: QuoteArgs) -> Result<()> {
    let (_, quote) = env.quote(&args.swap).await?;

    tracing::info!(
        provider = %quote.provider,
        input = %quote.input_amount,
        output = %quote.output_amount,
        fee = %quote.fees.amount,
        "Quote ready"
    );
    print_json(&quote)
}
