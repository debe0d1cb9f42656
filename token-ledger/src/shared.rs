//! Lock-guarded ledger for hosts that do not serialize calls
//!
//! Mutations hold the write lock for their whole validate-then-apply
//! section; reads take the read lock, so `token_info` never observes a
//! half-applied call.

use crate::{
    ledger::TokenLedger,
    types::{Address, Amount, TokenCall, TokenEvent, TokenInfo},
    Result,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to one ledger behind a reader-writer lock
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<TokenLedger>>,
}

impl SharedLedger {
    /// Wrap an owned ledger
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Apply a call on behalf of `caller`
    pub fn apply(&self, caller: Address, call: &TokenCall) -> Result<Vec<TokenEvent>> {
        let mut ledger = self.inner.write();
        let result = ledger.apply(caller, call);
        match &result {
            Ok(events) => tracing::debug!(
                op = call.kind(),
                %caller,
                events = events.len(),
                "call applied"
            ),
            Err(e) => tracing::debug!(op = call.kind(), %caller, error = %e, "call rejected"),
        }
        result
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(&self, from: Address, to: Address, amount: Amount) -> Result<Vec<TokenEvent>> {
        self.apply(from, &TokenCall::Transfer { to, amount })
    }

    /// Mint `amount` to `to` (owner only)
    pub fn mint(&self, caller: Address, to: Address, amount: Amount) -> Result<Vec<TokenEvent>> {
        self.apply(caller, &TokenCall::Mint { to, amount })
    }

    /// Burn `amount` of the caller's tokens
    pub fn burn(&self, caller: Address, amount: Amount) -> Result<Vec<TokenEvent>> {
        self.apply(caller, &TokenCall::Burn { amount })
    }

    /// Balance of `account`
    pub fn balance_of(&self, account: Address) -> Amount {
        self.inner.read().balance_of(account)
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.inner.read().owner()
    }

    /// Consistent snapshot of metadata and supply
    pub fn token_info(&self) -> TokenInfo {
        self.inner.read().token_info()
    }

    /// Run `f` against the ledger under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> R {
        f(&self.inner.read())
    }
}
