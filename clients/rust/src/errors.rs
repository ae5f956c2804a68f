//! Error types for the quote engine.
//!
//! Every failure surfaces as a [`BridgeError`]. Nothing inside the engine
//! retries; [`BridgeError::is_retryable`] is a hint for the calling layer.

use bridge_quote_core::CoreError;
use thiserror::Error;

/// Main error type for quoting and transaction assembly.
#[derive(Error, Debug)]
pub enum BridgeError {
    // Eligibility
    #[error("Route not supported: {0}")]
    RouteNotSupported(String),

    // Input validation
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    // Deployment configuration
    #[error("Upstream configuration not found: {0}")]
    UpstreamConfigNotFound(String),

    // Inverse quoting
    #[error("Quote did not converge to {target} after {attempts} attempts")]
    QuoteConvergenceFailure { target: String, attempts: u32 },

    #[error("Signing failed: {0}")]
    SigningFailure(#[source] anyhow::Error),

    // Collaborators
    #[error("{service} request failed: {source}")]
    Upstream {
        service: &'static str,
        source: anyhow::Error,
    },

    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Internal Errors
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl BridgeError {
    /// Whether the calling layer may reasonably retry the request.
    ///
    /// Only failures talking to collaborators qualify; eligibility, validation
    /// and configuration errors fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::Rpc(_) | BridgeError::Http(_) | BridgeError::Upstream { .. }
        )
    }

    /// Categorize the error for metrics and logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::RouteNotSupported(_) => ErrorCategory::Route,
            BridgeError::InvalidParam(_) => ErrorCategory::Validation,
            BridgeError::UpstreamConfigNotFound(_) => ErrorCategory::Config,
            BridgeError::QuoteConvergenceFailure { .. } => ErrorCategory::Solver,
            BridgeError::SigningFailure(_) => ErrorCategory::Signing,
            BridgeError::Upstream { .. } => ErrorCategory::Upstream,
            BridgeError::Rpc(_) | BridgeError::Http(_) => ErrorCategory::Network,
            BridgeError::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn route_not_supported(message: impl Into<String>) -> Self {
        BridgeError::RouteNotSupported(message.into())
    }

    pub fn invalid_param(message: impl Into<String>) -> Self {
        BridgeError::InvalidParam(message.into())
    }

    pub fn config_not_found(message: impl Into<String>) -> Self {
        BridgeError::UpstreamConfigNotFound(message.into())
    }

    /// Wrap a collaborator failure, keeping its cause chain.
    pub fn upstream(service: &'static str, source: impl Into<anyhow::Error>) -> Self {
        BridgeError::Upstream {
            service,
            source: source.into(),
        }
    }
}

impl From<CoreError> for BridgeError {
    fn from(err: CoreError) -> Self {
        if err.is_config_error() {
            BridgeError::UpstreamConfigNotFound(err.to_string())
        } else {
            BridgeError::InvalidParam(err.to_string())
        }
    }
}

/// Error category for metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Route failed eligibility
    Route,
    /// Input validation errors
    Validation,
    /// Missing domain, fee schedule or address entries
    Config,
    /// Inverse quote search exhausted
    Solver,
    /// Signer capability failures
    Signing,
    /// Collaborator service failures
    Upstream,
    /// Transport errors (RPC, HTTP)
    Network,
    /// Internal errors (unexpected failures)
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Route => write!(f, "route"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Solver => write!(f, "solver"),
            ErrorCategory::Signing => write!(f, "signing"),
            ErrorCategory::Upstream => write!(f, "upstream"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Internal => write!(f, "internal"),
        }
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(BridgeError::upstream("iris", anyhow::anyhow!("503")).is_retryable());
        assert!(!BridgeError::invalid_param("test").is_retryable());
        assert!(!BridgeError::route_not_supported("test").is_retryable());
        assert!(!BridgeError::config_not_found("domain").is_retryable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            BridgeError::route_not_supported("x").category(),
            ErrorCategory::Route
        );
        assert_eq!(
            BridgeError::QuoteConvergenceFailure {
                target: "1".to_string(),
                attempts: 9
            }
            .category(),
            ErrorCategory::Solver
        );
        assert_eq!(
            BridgeError::SigningFailure(anyhow::anyhow!("hsm offline")).category(),
            ErrorCategory::Signing
        );
    }

    #[test]
    fn test_core_error_mapping() {
        let missing: BridgeError = CoreError::not_found("chain", 1).into();
        assert!(matches!(missing, BridgeError::UpstreamConfigNotFound(_)));

        let overflow: BridgeError = CoreError::NumericalOverflow("fee").into();
        assert!(matches!(overflow, BridgeError::InvalidParam(_)));
    }

    #[test]
    fn test_upstream_keeps_cause() {
        let err = BridgeError::upstream("hyperliquid", anyhow::anyhow!("timeout"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("timeout"));
    }
}
