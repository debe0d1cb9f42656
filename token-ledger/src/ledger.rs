//! The token ledger aggregate
//!
//! `TokenLedger` is the authoritative record of balances, total supply and
//! owner for one token. It is a plain owned value: callers pass it by
//! `&mut` into each mutation, and whoever holds it decides how calls are
//! serialized (see [`crate::actor`] and [`crate::shared`]).
//!
//! Each mutation validates every precondition first and only then applies,
//! returning the events it emitted. A failed call changes nothing.
//!
//! # Example
//!
//! ```
//! use token_ledger::{Address, Amount, DeployParams, TokenLedger};
//!
//! let owner = Address::repeat_byte(0x01);
//! let mut ledger = TokenLedger::new(DeployParams {
//!     name: "My First Token".into(),
//!     symbol: "MFT".into(),
//!     decimals: 0,
//!     initial_supply: Amount::from(1000u64),
//!     max_supply: Amount::from(10000u64),
//!     owner,
//! })
//! .unwrap();
//!
//! let alice = Address::repeat_byte(0x0a);
//! ledger.transfer(owner, alice, Amount::from(50u64)).unwrap();
//! assert_eq!(ledger.balance_of(alice), Amount::from(50u64));
//! ```

use crate::{
    types::{Address, Amount, DeployParams, TokenCall, TokenEvent, TokenInfo},
    units, Error, Result,
};
use std::collections::HashMap;

/// Token ledger state
#[derive(Debug, Clone)]
pub struct TokenLedger {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    max_supply: Amount,
    owner: Address,
    balances: HashMap<Address, Amount>,
}

impl TokenLedger {
    /// Create the ledger, crediting the whole initial supply to the owner
    pub fn new(params: DeployParams) -> Result<Self> {
        Self::deploy(params).map(|(ledger, _)| ledger)
    }

    /// Create the ledger and return the creation events
    ///
    /// Emits `OwnershipTransferred(0x0, owner)` and, for a non-zero initial
    /// supply, `Transfer(0x0, owner, initial)`.
    pub fn deploy(params: DeployParams) -> Result<(Self, Vec<TokenEvent>)> {
        if params.owner == Address::ZERO {
            return Err(Error::InvalidArgument(
                "owner must not be the zero address".to_string(),
            ));
        }
        if params.initial_supply > params.max_supply {
            return Err(Error::InvalidArgument(format!(
                "initial supply {} exceeds max supply {}",
                params.initial_supply, params.max_supply
            )));
        }

        let initial = units::scale(params.initial_supply, params.decimals)?;
        let max_supply = units::scale(params.max_supply, params.decimals)?;

        let mut balances = HashMap::new();
        let mut events = vec![TokenEvent::OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: params.owner,
        }];
        if initial > Amount::ZERO {
            balances.insert(params.owner, initial);
            events.push(TokenEvent::Transfer {
                from: Address::ZERO,
                to: params.owner,
                amount: initial,
            });
        }

        let ledger = Self {
            name: params.name,
            symbol: params.symbol,
            decimals: params.decimals,
            total_supply: initial,
            max_supply,
            owner: params.owner,
            balances,
        };
        Ok((ledger, events))
    }

    /// Token name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Decimal places
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Supply cap
    pub fn max_supply(&self) -> Amount {
        self.max_supply
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Balance of `account`; zero for accounts never seen
    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Number of accounts holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Snapshot of the token metadata and supply
    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            total_supply: self.total_supply,
            max_supply: self.max_supply,
        }
    }

    /// Dispatch a signed call on behalf of `caller`
    pub fn apply(&mut self, caller: Address, call: &TokenCall) -> Result<Vec<TokenEvent>> {
        match *call {
            TokenCall::Transfer { to, amount } => self.transfer(caller, to, amount),
            TokenCall::Mint { to, amount } => self.mint(caller, to, amount),
            TokenCall::Burn { amount } => self.burn(caller, amount),
            TokenCall::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, new_owner)
            }
        }
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<TokenEvent>> {
        if from == Address::ZERO {
            return Err(Error::InvalidArgument(
                "sender must not be the zero address".to_string(),
            ));
        }
        if to == Address::ZERO {
            return Err(Error::InvalidArgument(
                "recipient must not be the zero address".to_string(),
            ));
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(Error::InsufficientBalance {
                account: from,
                available: from_balance,
                requested: amount,
            });
        }

        // Self-transfer leaves balances untouched.
        if from != to {
            let to_balance = self.balance_of(to);
            // Cannot overflow: to_balance + amount <= total_supply.
            let credited = to_balance.checked_add(amount).ok_or_else(|| {
                Error::InvariantViolation(format!("balance of {} overflows", to))
            })?;
            self.set_balance(from, from_balance - amount);
            self.set_balance(to, credited);
        }

        Ok(vec![TokenEvent::Transfer { from, to, amount }])
    }

    /// Create `amount` new tokens for `to`
    ///
    /// Checks run in a fixed order: owner authorization, then arguments,
    /// then the supply cap.
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> Result<Vec<TokenEvent>> {
        self.only_owner(caller)?;

        if to == Address::ZERO {
            return Err(Error::InvalidArgument(
                "cannot mint to the zero address".to_string(),
            ));
        }
        if amount == Amount::ZERO {
            return Err(Error::InvalidArgument("mint amount must be positive".to_string()));
        }

        let new_supply = match self.total_supply.checked_add(amount) {
            Some(supply) if supply <= self.max_supply => supply,
            other => {
                return Err(Error::SupplyCapExceeded {
                    max_supply: self.max_supply,
                    requested: other.unwrap_or(Amount::MAX),
                })
            }
        };

        // Bounded by new_supply, so no overflow.
        let credited = self.balance_of(to) + amount;
        self.set_balance(to, credited);
        self.total_supply = new_supply;

        Ok(vec![
            TokenEvent::Transfer {
                from: Address::ZERO,
                to,
                amount,
            },
            TokenEvent::TokensMinted { to, amount },
        ])
    }

    /// Destroy `amount` of the caller's own tokens
    pub fn burn(&mut self, caller: Address, amount: Amount) -> Result<Vec<TokenEvent>> {
        if amount == Amount::ZERO {
            return Err(Error::InvalidArgument("burn amount must be positive".to_string()));
        }

        let balance = self.balance_of(caller);
        if balance < amount {
            return Err(Error::InsufficientBalance {
                account: caller,
                available: balance,
                requested: amount,
            });
        }

        self.set_balance(caller, balance - amount);
        self.total_supply -= amount;

        Ok(vec![
            TokenEvent::Transfer {
                from: caller,
                to: Address::ZERO,
                amount,
            },
            TokenEvent::TokensBurned {
                from: caller,
                amount,
            },
        ])
    }

    /// Hand ownership to `new_owner`
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Vec<TokenEvent>> {
        self.only_owner(caller)?;

        if new_owner == Address::ZERO {
            return Err(Error::InvalidArgument(
                "new owner must not be the zero address".to_string(),
            ));
        }

        let previous_owner = self.owner;
        self.owner = new_owner;

        Ok(vec![TokenEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        }])
    }

    /// Recompute the supply invariants from the balance map
    pub fn check_invariants(&self) -> Result<()> {
        let mut sum = Amount::ZERO;
        for (account, balance) in &self.balances {
            sum = sum.checked_add(*balance).ok_or_else(|| {
                Error::InvariantViolation(format!("balance sum overflows at {}", account))
            })?;
        }

        if sum != self.total_supply {
            return Err(Error::InvariantViolation(format!(
                "sum of balances {} != total supply {}",
                sum, self.total_supply
            )));
        }
        if self.total_supply > self.max_supply {
            return Err(Error::InvariantViolation(format!(
                "total supply {} exceeds max supply {}",
                self.total_supply, self.max_supply
            )));
        }
        if self.owner == Address::ZERO {
            return Err(Error::InvariantViolation("owner is the zero address".to_string()));
        }

        Ok(())
    }

    fn only_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(Error::Unauthorized {
                caller,
                owner: self.owner,
            });
        }
        Ok(())
    }

    // Zero balances are dropped so the map only holds live accounts.
    fn set_balance(&mut self, account: Address, balance: Amount) {
        if balance == Amount::ZERO {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}
