//! Token client
//!
//! Validates user input, pre-checks balances and relays calls through the
//! submission channel. Authorization and supply rules stay with the ledger;
//! the client only rejects what it can see is hopeless before signing.

use crate::{Error, Result};
use serde::Serialize;
use token_ledger::{
    parse_address,
    units::{format_units, parse_units},
    Address, Amount, LedgerHandle, Receipt, Signer, TokenCall, TokenInfo,
};
use uuid::Uuid;

/// What the wallet view shows for the connected account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    /// Connected account
    pub account: Address,
    /// Token metadata and supply
    pub info: TokenInfo,
    /// Balance of the connected account
    pub balance: Amount,
    /// Current owner
    pub owner: Address,
    /// Whether minting should be offered
    pub is_owner: bool,
}

impl AccountView {
    /// Balance as `"<amount> <symbol>"`
    pub fn display_balance(&self) -> String {
        format!(
            "{} {}",
            format_units(self.balance, self.info.decimals),
            self.info.symbol
        )
    }

    /// Total supply as `"<amount> <symbol>"`
    pub fn display_total_supply(&self) -> String {
        format!(
            "{} {}",
            format_units(self.info.total_supply, self.info.decimals),
            self.info.symbol
        )
    }
}

/// Client bound to one signer and one ledger
#[derive(Debug)]
pub struct TokenClient<S> {
    signer: S,
    handle: LedgerHandle,
}

impl<S: Signer> TokenClient<S> {
    /// Connect `signer` to the ledger behind `handle`
    pub fn new(signer: S, handle: LedgerHandle) -> Self {
        tracing::info!(account = %signer.address(), "wallet connected");
        Self { signer, handle }
    }

    /// Connected account
    pub fn account(&self) -> Address {
        self.signer.address()
    }

    /// Load token info, balance and owner status for the connected account
    pub async fn load_info(&self) -> Result<AccountView> {
        let account = self.account();
        let info = self.handle.token_info().await?;
        let balance = self.handle.balance_of(account).await?;
        let owner = self.handle.owner().await?;

        Ok(AccountView {
            account,
            info,
            balance,
            owner,
            is_owner: owner == account,
        })
    }

    /// Transfer `amount` (display units) to `to`
    pub async fn transfer(&self, to: &str, amount: &str) -> Result<Receipt> {
        let to = required("recipient", to).and_then(|t| Ok(parse_address(t)?))?;
        let amount = self.parse_amount(amount).await?;
        self.ensure_balance(amount).await?;

        self.submit(TokenCall::Transfer { to, amount }).await
    }

    /// Mint `amount` (display units) to `to`
    ///
    /// Not gated on ownership here; a non-owner gets the ledger's
    /// `Unauthorized` back.
    pub async fn mint(&self, to: &str, amount: &str) -> Result<Receipt> {
        let to = required("recipient", to).and_then(|t| Ok(parse_address(t)?))?;
        let amount = self.parse_amount(amount).await?;

        self.submit(TokenCall::Mint { to, amount }).await
    }

    /// Burn `amount` (display units) of the connected account's tokens
    pub async fn burn(&self, amount: &str) -> Result<Receipt> {
        let amount = self.parse_amount(amount).await?;
        self.ensure_balance(amount).await?;

        self.submit(TokenCall::Burn { amount }).await
    }

    /// Hand ownership to `new_owner`
    pub async fn transfer_ownership(&self, new_owner: &str) -> Result<Receipt> {
        let new_owner = required("new owner", new_owner).and_then(|t| Ok(parse_address(t)?))?;
        self.submit(TokenCall::TransferOwnership { new_owner }).await
    }

    async fn parse_amount(&self, amount: &str) -> Result<Amount> {
        let amount = required("amount", amount)?;
        let decimals = self.handle.token_info().await?.decimals;
        Ok(parse_units(amount, decimals)?)
    }

    async fn ensure_balance(&self, amount: Amount) -> Result<()> {
        let account = self.account();
        let available = self.handle.balance_of(account).await?;
        if amount > available {
            tracing::debug!(%account, %available, requested = %amount, "insufficient balance, not submitting");
            return Err(token_ledger::Error::InsufficientBalance {
                account,
                available,
                requested: amount,
            }
            .into());
        }
        Ok(())
    }

    async fn submit(&self, call: TokenCall) -> Result<Receipt> {
        let op = call.kind();
        let signed = self.signer.sign_call(Uuid::now_v7(), call)?;
        let pending = self.handle.submit(signed).await?;
        tracing::info!(submission_id = %pending.submission_id(), op, "submission pending");

        let receipt = pending.wait().await?;
        tracing::info!(
            submission_id = %receipt.submission_id,
            op,
            events = receipt.events.len(),
            "submission committed"
        );
        Ok(receipt)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MissingInput(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use token_ledger::{spawn_ledger_actor, DeployParams, KeyPair, TokenEvent, TokenLedger};

    const ALICE: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn ether(n: u64) -> Amount {
        token_ledger::units::scale(Amount::from(n), 18).unwrap()
    }

    fn setup() -> (TokenClient<KeyPair>, TokenClient<KeyPair>, LedgerHandle) {
        let owner = KeyPair::from_seed(&[1u8; 32]);
        let other = KeyPair::from_seed(&[2u8; 32]);
        let ledger = TokenLedger::new(DeployParams {
            name: "My First Token".into(),
            symbol: "MFT".into(),
            decimals: 18,
            initial_supply: Amount::from(1000u64),
            max_supply: Amount::from(10000u64),
            owner: owner.address(),
        })
        .unwrap();
        let handle = spawn_ledger_actor(ledger, 64, 64).unwrap();
        (
            TokenClient::new(owner, handle.clone()),
            TokenClient::new(other, handle.clone()),
            handle,
        )
    }

    #[tokio::test]
    async fn test_load_info() {
        let (owner, other, handle) = setup();

        let view = owner.load_info().await.unwrap();
        assert!(view.is_owner);
        assert_eq!(view.balance, ether(1000));
        assert_eq!(view.display_balance(), "1000.0 MFT");
        assert_eq!(view.display_total_supply(), "1000.0 MFT");

        let view = other.load_info().await.unwrap();
        assert!(!view.is_owner);
        assert_eq!(view.display_balance(), "0.0 MFT");

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_transfer_with_display_amount() {
        let (owner, _, handle) = setup();
        let alice = parse_address(ALICE).unwrap();

        let receipt = owner.transfer(ALICE, "12.5").await.unwrap();
        let amount = parse_units("12.5", 18).unwrap();
        assert_eq!(
            receipt.events,
            vec![TokenEvent::Transfer {
                from: owner.account(),
                to: alice,
                amount,
            }]
        );
        assert_eq!(handle.balance_of(alice).await.unwrap(), amount);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_inputs_never_reach_ledger() {
        let (owner, _, handle) = setup();

        assert!(matches!(
            owner.transfer("", "1").await,
            Err(Error::MissingInput("recipient"))
        ));
        assert!(matches!(
            owner.transfer(ALICE, " ").await,
            Err(Error::MissingInput("amount"))
        ));
        assert!(matches!(
            owner.transfer("0xnope", "1").await,
            Err(Error::Ledger(token_ledger::Error::InvalidArgument(_)))
        ));
        assert!(matches!(
            owner.mint(ALICE, "-3").await,
            Err(Error::Ledger(token_ledger::Error::InvalidArgument(_)))
        ));

        let committed = handle.metrics().committed.with_label_values(&["transfer"]).get();
        assert_eq!(committed, 0);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_balance_precheck() {
        let (_, other, handle) = setup();

        let result = other.burn("1").await;
        assert!(matches!(
            result.as_ref().map_err(|e| e.ledger()),
            Err(Some(token_ledger::Error::InsufficientBalance { .. }))
        ));
        // Rejected before signing, so the actor never saw it.
        assert_eq!(handle.metrics().rejected.with_label_values(&["burn"]).get(), 0);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_mint_by_non_owner_rejected_by_ledger() {
        let (_, other, handle) = setup();

        let result = other.mint(ALICE, "1").await;
        assert!(matches!(
            result,
            Err(Error::Ledger(token_ledger::Error::Unauthorized { .. }))
        ));
        assert_eq!(handle.metrics().rejected.with_label_values(&["mint"]).get(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_mint_and_burn_roundtrip_supply() {
        let (owner, _, handle) = setup();

        owner.mint(&owner.account().to_string(), "9000").await.unwrap();
        assert_eq!(
            owner.load_info().await.unwrap().display_total_supply(),
            "10000.0 MFT"
        );

        owner.burn("0.5").await.unwrap();
        assert_eq!(
            owner.load_info().await.unwrap().display_total_supply(),
            "9999.5 MFT"
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_transfer_ownership() {
        let (owner, other, handle) = setup();

        owner
            .transfer_ownership(&other.account().to_string())
            .await
            .unwrap();
        assert!(other.load_info().await.unwrap().is_owner);
        assert!(!owner.load_info().await.unwrap().is_owner);

        handle.shutdown().await.unwrap();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: over-balance transfers are stopped client-side
        #[test]
        fn prop_overdraw_stopped_before_submit(excess in 1u64..1_000_000) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let (owner, _, handle) = setup();
                let amount = format!("{}", 1000 + excess);

                let result = owner.transfer(ALICE, &amount).await;
                let stopped = matches!(
                    result,
                    Err(Error::Ledger(token_ledger::Error::InsufficientBalance { .. }))
                );
                prop_assert!(stopped);
                prop_assert_eq!(handle.metrics().rejected.with_label_values(&["transfer"]).get(), 0);

                handle.shutdown().await.unwrap();
                Ok(())
            })?;
        }
    }
}
