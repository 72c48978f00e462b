use thiserror::Error;

/// Severity of a withdrawal-invariant violation.
///
/// `Error` blocks submission; `Warning` is advisory and is paired with a
/// suggested remedy (typically: raise the slippage tolerance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Error, Debug)]
pub enum DexError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient balance: {0}")]
    Balance(String),

    #[error("Slippage exceeded: {0}")]
    Slippage(String),

    #[error("Withdrawal error: {0}")]
    Withdrawal(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, DexError>;

impl From<serde_json::Error> for DexError {
    fn from(err: serde_json::Error) -> Self {
        DexError::Unknown(err.to_string())
    }
}

impl From<hex::FromHexError> for DexError {
    fn from(err: hex::FromHexError) -> Self {
        DexError::Validation(err.to_string())
    }
}
