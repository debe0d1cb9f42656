//! Error types for the token client

use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Client errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (rejection or channel failure)
    #[error("Ledger error: {0}")]
    Ledger(#[from] token_ledger::Error),

    /// Required input left blank
    #[error("Missing input: {0}")]
    MissingInput(&'static str),
}

impl Error {
    /// The ledger error behind this one, if any
    pub fn ledger(&self) -> Option<&token_ledger::Error> {
        match self {
            Error::Ledger(e) => Some(e),
            Error::MissingInput(_) => None,
        }
    }
}
