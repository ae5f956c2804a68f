//! Key-backed quote signer.

use std::{fmt, str::FromStr};

use alloy::{
    primitives::{Address, Bytes, B256},
    signers::{local::PrivateKeySigner, Signer},
};
use async_trait::async_trait;

use crate::{api::QuoteSigner, config::ConfigError};

/// Signs sponsored-quote digests with a local secp256k1 key.
#[derive(Clone)]
pub struct LocalQuoteSigner {
    inner: PrivateKeySigner,
}

impl fmt::Debug for LocalQuoteSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalQuoteSigner").field(&self.inner.address()).finish()
    }
}

impl LocalQuoteSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }

    /// Load a hex-encoded private key.
    pub fn from_hex(key: &str) -> Result<Self, ConfigError> {
        PrivateKeySigner::from_str(key.trim())
            .map(Self::new)
            .map_err(|e| ConfigError::InvalidKey(e.to_string()))
    }

    pub fn random() -> Self {
        Self::new(PrivateKeySigner::random())
    }
}

#[async_trait]
impl QuoteSigner for LocalQuoteSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign_digest(&self, digest: B256) -> anyhow::Result<Bytes> {
        Ok(self.inner.sign_hash(&digest).await?.as_bytes().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{keccak256, Signature};

    #[tokio::test]
    async fn test_signature_recovers_signer() {
        let signer = LocalQuoteSigner::random();
        let digest = keccak256(b"sponsored quote");

        let bytes = signer.sign_digest(digest).await.unwrap();
        assert_eq!(bytes.len(), 65);

        let signature = Signature::try_from(bytes.as_ref()).unwrap();
        let recovered = signature.recover_address_from_prehash(&digest).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn test_invalid_key() {
        assert!(matches!(
            LocalQuoteSigner::from_hex("not-a-key"),
            Err(ConfigError::InvalidKey(_))
        ));
    }
}
