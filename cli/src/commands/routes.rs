use anyhow::Result;
use clap::Args;
use serde::Serialize;

use bridge_quote_client::BridgeProvider;

use super::{print_json, Environment, RouteArgs};

#[derive(Args, Debug)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub route: RouteArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutesOutput {
    route: String,
    providers: Vec<BridgeProvider>,
}

pub fn execute(env: &Environment, args: RoutesArgs) -> Result<()> {
    let (input_token, output_token) = args.route.tokens(&env.config)?;
    let route = bridge_quote_client::Route {
        input_token: &input_token,
        output_token: &output_token,
    };
    let providers = env
        .client
        .strategies_for(&route)
        .into_iter()
        .map(|s| s.kind())
        .collect::<Vec<_>>();

    if providers.is_empty() {
        tracing::warn!(%route, "No bridge serves this route");
    }
    print_json(&RoutesOutput {
        route: route.to_string(),
        providers,
    })
}
