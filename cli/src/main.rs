use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

mod commands;

use commands::{build_tx::BuildTxArgs, quote::QuoteArgs, routes::RoutesArgs};

#[derive(Parser)]
#[command(name = "bridge-quote-cli")]
#[command(about = "Quote cross-chain transfers and build unsigned deposit transactions", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine configuration file (YAML)
    #[arg(long, short = 'c', default_value = "bridge.yaml", global = true, env = "BRIDGE_QUOTE_CONFIG")]
    config: PathBuf,

    /// Hex private key used to sign sponsored quotes
    #[arg(long, global = true, env = "BRIDGE_QUOTE_SIGNER_KEY", hide_env_values = true)]
    signer_key: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a transfer with the preferred eligible bridge
    Quote(QuoteArgs),

    /// Quote a transfer and build the unsigned deposit transaction
    BuildTx(BuildTxArgs),

    /// List the bridges able to serve a route, most preferred first
    Routes(RoutesArgs),
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let env = commands::Environment::load(&cli.config, cli.signer_key.as_deref())?;
    match cli.command {
        Commands::Quote(args) => commands::quote::execute(&env, args).await,
        Commands::BuildTx(args) => commands::build_tx::execute(&env, args).await,
        Commands::Routes(args) => commands::routes::execute(&env, args),
    }
}
