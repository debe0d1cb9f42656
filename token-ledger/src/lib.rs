//! Token Ledger
//!
//! Capped, owner-minted fungible token with invariant-checked transfers,
//! mints and burns.
//!
//! # Architecture
//!
//! - **Owned aggregate**: `TokenLedger` is a plain value mutated through `&mut`
//! - **Single Writer**: the submission actor owns the ledger, so calls never interleave
//! - **Signed calls**: the caller identity comes from a `Signer`, never from key material
//! - **Events as output**: every mutation returns the events it emitted
//!
//! # Invariants
//!
//! - Supply conservation: total_supply == Σ(balances) for all time
//! - Cap: total_supply <= max_supply
//! - Owner is never the zero address
//! - All-or-nothing: a rejected call leaves no trace

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod ledger;
pub mod shared;
pub mod signer;
pub mod units;
pub mod error;
pub mod actor;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    parse_address, Address, Amount, DeployParams, Receipt, Signature, TokenCall, TokenEvent,
    TokenInfo,
};
pub use ledger::TokenLedger;
pub use shared::SharedLedger;
pub use signer::{KeyPair, SignedCall, Signer};
pub use actor::{spawn_ledger_actor, LedgerHandle, PendingSubmission};
pub use config::Config;
