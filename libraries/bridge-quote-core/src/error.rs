//! Error types

use thiserror::Error;

/// Errors raised by the pure domain layer.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CoreError {
    /// A registry lookup found no entry. Always a deployment/configuration bug.
    #[error("{kind} not configured for {key}")]
    ConfigNotFound { kind: &'static str, key: String },

    /// Checked arithmetic overflowed.
    #[error("Numerical overflow in {0}")]
    NumericalOverflow(&'static str),

    /// Amount cannot cover the fees charged against it.
    #[error("Amount {amount} does not cover fees of {fees}")]
    AmountBelowFees { amount: String, fees: String },

    /// Basis points outside of `0..10000`.
    #[error("Invalid basis points: {0}")]
    InvalidBps(u64),

    /// Address could not be parsed for the requested ecosystem.
    #[error("Invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    /// A ratio was requested against a zero amount.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Unknown execution mode {0}")]
    InvalidExecutionMode(u8),

    /// Amount does not fit into the target integer width.
    #[error("Amount {0} exceeds the target integer width")]
    AmountTooLarge(String),
}

impl CoreError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        CoreError::ConfigNotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// True when the error indicates missing configuration rather than bad input.
    pub fn is_config_error(&self) -> bool {
        matches!(self, CoreError::ConfigNotFound { .. })
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
