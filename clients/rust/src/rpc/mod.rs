//! Solana RPC access.

use std::sync::Arc;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash};

use crate::{api::SvmChainReader, errors::BridgeError};

/// [`SvmChainReader`] backed by the nonblocking `solana-client` RPC client.
#[derive(Clone)]
pub struct SolanaRpcReader {
    rpc: Arc<RpcClient>,
}

impl SolanaRpcReader {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc: Arc::new(RpcClient::new_with_commitment(
                rpc_url.into(),
                CommitmentConfig::confirmed(),
            )),
        }
    }

    pub fn from_client(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl SvmChainReader for SolanaRpcReader {
    async fn latest_blockhash(&self) -> Result<Hash, BridgeError> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }
}
