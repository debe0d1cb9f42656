//! Core types for the token ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode) of anything that gets signed
//! - Byte-exact account identity (20-byte addresses)
//! - Exact arithmetic (256-bit unsigned amounts, checked everywhere)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use alloy_primitives::{Address, U256};

/// Token amount in base units (scaled by `decimals`)
pub type Amount = U256;

/// Parse an account address from user input
///
/// Accepts 40 hex digits with or without a `0x` prefix. Anything else is an
/// `InvalidArgument`.
pub fn parse_address(text: &str) -> crate::Result<Address> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(crate::Error::InvalidArgument("empty address".to_string()));
    }
    Address::from_str(trimmed)
        .map_err(|e| crate::Error::InvalidArgument(format!("invalid address '{}': {}", trimmed, e)))
}

/// Immutable parameters supplied when the ledger is created
///
/// Supplies are given in whole tokens and scaled by `10^decimals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployParams {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimal places of the display unit
    pub decimals: u8,
    /// Whole tokens credited to the owner at creation
    pub initial_supply: Amount,
    /// Whole-token supply cap
    pub max_supply: Amount,
    /// Initial owner (minting authority)
    pub owner: Address,
}

/// Snapshot returned by `token_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Current total supply (base units)
    pub total_supply: Amount,
    /// Supply cap (base units)
    pub max_supply: Amount,
}

/// A mutating call, as a signer submits it
///
/// The caller is not part of the call; it comes from whoever signs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    /// Move tokens from the caller to `to`
    Transfer {
        /// Recipient
        to: Address,
        /// Base units
        amount: Amount,
    },
    /// Create tokens for `to` (owner only)
    Mint {
        /// Recipient
        to: Address,
        /// Base units
        amount: Amount,
    },
    /// Destroy tokens held by the caller
    Burn {
        /// Base units
        amount: Amount,
    },
    /// Hand the minting authority to another account (owner only)
    TransferOwnership {
        /// Next owner
        new_owner: Address,
    },
}

impl TokenCall {
    /// Short operation name for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            TokenCall::Transfer { .. } => "transfer",
            TokenCall::Mint { .. } => "mint",
            TokenCall::Burn { .. } => "burn",
            TokenCall::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

/// Event emitted by a successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// Balance moved; `from` is zero on mint, `to` is zero on burn
    Transfer {
        /// Debited account
        from: Address,
        /// Credited account
        to: Address,
        /// Base units
        amount: Amount,
    },
    /// Owner minted new supply
    TokensMinted {
        /// Recipient
        to: Address,
        /// Base units
        amount: Amount,
    },
    /// Holder burned part of their balance
    TokensBurned {
        /// Burner
        from: Address,
        /// Base units
        amount: Amount,
    },
    /// Minting authority changed hands
    OwnershipTransferred {
        /// Previous owner (zero at creation)
        previous_owner: Address,
        /// New owner
        new_owner: Address,
    },
}

impl fmt::Display for TokenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenEvent::Transfer { from, to, amount } => {
                write!(f, "Transfer({}, {}, {})", from, to, amount)
            }
            TokenEvent::TokensMinted { to, amount } => write!(f, "TokensMinted({}, {})", to, amount),
            TokenEvent::TokensBurned { from, amount } => {
                write!(f, "TokensBurned({}, {})", from, amount)
            }
            TokenEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => write!(f, "OwnershipTransferred({}, {})", previous_owner, new_owner),
        }
    }
}

/// Outcome of a committed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Submission this receipt answers
    pub submission_id: Uuid,
    /// Account that signed the call
    pub caller: Address,
    /// Events emitted, in order
    pub events: Vec<TokenEvent>,
    /// Commit time
    pub committed_at: DateTime<Utc>,
}

/// Digital signature (Ed25519)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Signature bytes (64 bytes)
    #[serde(with = "serde_bytes")]
    bytes: [u8; 64],
}

impl Signature {
    /// Create from bytes
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self { bytes }
    }

    /// Get bytes
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }
}
