use ethers_core::types::Address;
use thiserror::Error;

/// Why an integer-like field could not be read.
///
/// These never escape the deriver; they only decide which fallback a field takes.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("negative amount {0}")]
    Negative(String),
    #[error("not an integer: {0}")]
    NotInteger(String),
    #[error("amount {0} does not fit in 256 bits")]
    Overflow(String),
    #[error("unsupported amount encoding: {0}")]
    Unsupported(String),
}

/// Failure of an upstream query.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read claim data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed claim data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no claim data for contract {0:?}")]
    UnknownContract(Address),
    #[error("{0}")]
    Unavailable(String),
}
