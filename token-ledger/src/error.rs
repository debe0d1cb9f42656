//! Error types for the token ledger

use crate::types::{Address, Amount};
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every rejection happens before state is touched, so a failed call
/// leaves balances, supply and owner exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Caller is not the ledger owner
    #[error("Unauthorized: caller {caller} is not the owner {owner}")]
    Unauthorized {
        /// Account that attempted the call
        caller: Address,
        /// Current owner
        owner: Address,
    },

    /// Mint would push total supply past the cap
    #[error("Exceeds maximum supply: max {max_supply}, requested total {requested}")]
    SupplyCapExceeded {
        /// Immutable supply cap
        max_supply: Amount,
        /// Total supply the mint would have produced (saturated on overflow)
        requested: Amount,
    },

    /// Transfer or burn exceeds the account balance
    #[error("Insufficient balance for {account}: have {available}, need {requested}")]
    InsufficientBalance {
        /// Debited account
        account: Address,
        /// Current balance
        available: Amount,
        /// Amount asked for
        requested: Amount,
    },

    /// Malformed address, zero amount, bad deployment parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invariant violation (supply conservation, cap)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Signature verification failed
    #[error("Signature verification failed: {0}")]
    SignatureError(String),

    /// Submission id already seen
    #[error("Duplicate submission: {0}")]
    DuplicateSubmission(String),

    /// Submission id has no timestamp or lies outside the replay window
    #[error("Stale submission: {0}")]
    StaleSubmission(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// True for rejections caused by the call itself rather than the host
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::Unauthorized { .. }
                | Error::SupplyCapExceeded { .. }
                | Error::InsufficientBalance { .. }
                | Error::InvalidArgument(_)
                | Error::SignatureError(_)
                | Error::DuplicateSubmission(_)
                | Error::StaleSubmission(_)
        )
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
