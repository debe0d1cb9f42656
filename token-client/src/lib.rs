//! Token Client
//!
//! Wallet-side glue between a [`Signer`](token_ledger::Signer) and the
//! ledger's submission channel.
//!
//! # Flow
//!
//! 1. **Input**: raw strings as a user would type them (address, amount)
//! 2. **Validation**: addresses parsed, amounts scaled by the token decimals
//! 3. **Pre-check**: balance checked before transfers and burns
//! 4. **Submission**: call signed, submitted, receipt awaited
//!
//! # Example
//!
//! ```no_run
//! use token_client::TokenClient;
//! use token_ledger::{spawn_ledger_actor, Config, KeyPair, Signer, TokenLedger};
//!
//! #[tokio::main]
//! async fn main() -> token_client::Result<()> {
//!     let owner = KeyPair::generate();
//!     let params = Config::default().token.deploy_params(owner.address())?;
//!     let handle = spawn_ledger_actor(TokenLedger::new(params)?, 100, 100)?;
//!
//!     let client = TokenClient::new(owner, handle);
//!     client.transfer("0x5FbDB2315678afecb367f032d93F642f64180aa3", "12.5").await?;
//!     println!("{}", client.load_info().await?.display_balance());
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod client;

// Re-exports
pub use error::{Error, Result};
pub use client::{AccountView, TokenClient};
