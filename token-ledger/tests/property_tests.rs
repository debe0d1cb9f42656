//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Supply conservation: total_supply == Σ(balances)
//! - Cap: total_supply <= max_supply
//! - All-or-nothing: rejected calls leave state untouched
//! - Authorization before cap: non-owner mints always fail as Unauthorized

use proptest::prelude::*;
use token_ledger::{
    spawn_ledger_actor, Address, Amount, DeployParams, Error, KeyPair, Signer, TokenCall,
    TokenLedger,
};
use uuid::Uuid;

const ACCOUNTS: usize = 4;
const INITIAL: u64 = 1_000;
const MAX: u64 = 10_000;

fn account(i: usize) -> Address {
    Address::repeat_byte(0x10 + i as u8)
}

fn create_ledger() -> TokenLedger {
    TokenLedger::new(DeployParams {
        name: "My First Token".into(),
        symbol: "MFT".into(),
        decimals: 0,
        initial_supply: Amount::from(INITIAL),
        max_supply: Amount::from(MAX),
        owner: account(0),
    })
    .unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Transfer { from: usize, to: usize, amount: u64 },
    Mint { caller: usize, to: usize, amount: u64 },
    Burn { caller: usize, amount: u64 },
    TransferOwnership { caller: usize, new_owner: usize },
}

/// Strategy for generating ledger operations
fn op_strategy() -> impl Strategy<Value = Op> {
    let idx = 0..ACCOUNTS;
    prop_oneof![
        4 => (idx.clone(), idx.clone(), 0u64..3_000)
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        3 => (idx.clone(), idx.clone(), 0u64..5_000)
            .prop_map(|(caller, to, amount)| Op::Mint { caller, to, amount }),
        2 => (idx.clone(), 0u64..2_000).prop_map(|(caller, amount)| Op::Burn { caller, amount }),
        1 => (idx.clone(), idx).prop_map(|(caller, new_owner)| Op::TransferOwnership { caller, new_owner }),
    ]
}

fn apply(ledger: &mut TokenLedger, op: &Op) -> token_ledger::Result<Vec<token_ledger::TokenEvent>> {
    match *op {
        Op::Transfer { from, to, amount } => {
            ledger.transfer(account(from), account(to), Amount::from(amount))
        }
        Op::Mint { caller, to, amount } => {
            ledger.mint(account(caller), account(to), Amount::from(amount))
        }
        Op::Burn { caller, amount } => ledger.burn(account(caller), Amount::from(amount)),
        Op::TransferOwnership { caller, new_owner } => {
            ledger.transfer_ownership(account(caller), account(new_owner))
        }
    }
}

/// Observable state: balances of every account, supply, owner
fn snapshot(ledger: &TokenLedger) -> (Vec<Amount>, Amount, Address) {
    let balances = (0..ACCOUNTS).map(|i| ledger.balance_of(account(i))).collect();
    (balances, ledger.total_supply(), ledger.owner())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: supply equals the sum of balances and stays under the cap
    #[test]
    fn prop_supply_conserved(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = create_ledger();

        for op in &ops {
            let _ = apply(&mut ledger, op);

            let (balances, total, _) = snapshot(&ledger);
            let sum = balances.iter().fold(Amount::ZERO, |acc, b| acc + *b);
            prop_assert_eq!(sum, total);
            prop_assert!(total <= ledger.max_supply());
            prop_assert!(ledger.check_invariants().is_ok());
        }
    }

    /// Property: a rejected call changes nothing and emits nothing
    #[test]
    fn prop_rejections_are_atomic(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = create_ledger();

        for op in &ops {
            let before = snapshot(&ledger);
            match apply(&mut ledger, op) {
                Ok(events) => prop_assert!(!events.is_empty()),
                Err(_) => prop_assert_eq!(snapshot(&ledger), before),
            }
        }
    }

    /// Property: minting by a non-owner always fails as Unauthorized
    #[test]
    fn prop_non_owner_mint_unauthorized(
        caller in 1..ACCOUNTS,
        to in 0..ACCOUNTS,
        amount in 0u64..1_000_000,
    ) {
        let mut ledger = create_ledger();
        let before = snapshot(&ledger);

        let result = ledger.mint(account(caller), account(to), Amount::from(amount));
        let is_unauthorized = matches!(result, Err(Error::Unauthorized { .. }));
        prop_assert!(is_unauthorized);
        prop_assert_eq!(snapshot(&ledger), before);
    }

    /// Property: mints past the cap fail and leave state unchanged
    #[test]
    fn prop_mint_over_cap_rejected(
        headroom_used in 0u64..=(MAX - INITIAL),
        excess in 1u64..1_000_000,
    ) {
        let mut ledger = create_ledger();
        if headroom_used > 0 {
            ledger.mint(account(0), account(1), Amount::from(headroom_used)).unwrap();
        }
        let before = snapshot(&ledger);

        let remaining = MAX - INITIAL - headroom_used;
        let result = ledger.mint(account(0), account(2), Amount::from(remaining + excess));
        let is_cap = matches!(result, Err(Error::SupplyCapExceeded { .. }));
        prop_assert!(is_cap);
        prop_assert_eq!(snapshot(&ledger), before);
    }

    /// Property: burning or transferring more than the balance fails
    #[test]
    fn prop_overdraw_rejected(held in 0u64..=INITIAL, excess in 1u64..10_000, burn in any::<bool>()) {
        let mut ledger = create_ledger();
        if held > 0 {
            ledger.transfer(account(0), account(1), Amount::from(held)).unwrap();
        }
        let before = snapshot(&ledger);

        let amount = Amount::from(held + excess);
        let result = if burn {
            ledger.burn(account(1), amount)
        } else {
            ledger.transfer(account(1), account(2), amount)
        };
        let is_insufficient = matches!(result, Err(Error::InsufficientBalance { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(snapshot(&ledger), before);
    }

    /// Property: the actor commits exactly what the bare ledger would
    #[test]
    fn prop_actor_matches_ledger(ops in prop::collection::vec(op_strategy(), 1..20)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let keys: Vec<KeyPair> = (0..ACCOUNTS)
                .map(|i| KeyPair::from_seed(&[i as u8 + 1; 32]))
                .collect();
            let addr = |i: usize| keys[i].address();

            let params = DeployParams {
                name: "My First Token".into(),
                symbol: "MFT".into(),
                decimals: 0,
                initial_supply: Amount::from(INITIAL),
                max_supply: Amount::from(MAX),
                owner: addr(0),
            };
            let mut reference = TokenLedger::new(params.clone()).unwrap();
            let handle = spawn_ledger_actor(TokenLedger::new(params).unwrap(), 64, 64).unwrap();

            for op in &ops {
                let (signer, call) = match *op {
                    Op::Transfer { from, to, amount } => (from, TokenCall::Transfer { to: addr(to), amount: Amount::from(amount) }),
                    Op::Mint { caller, to, amount } => (caller, TokenCall::Mint { to: addr(to), amount: Amount::from(amount) }),
                    Op::Burn { caller, amount } => (caller, TokenCall::Burn { amount: Amount::from(amount) }),
                    Op::TransferOwnership { caller, new_owner } => (caller, TokenCall::TransferOwnership { new_owner: addr(new_owner) }),
                };

                let expected = reference.apply(addr(signer), &call);
                let signed = keys[signer].sign_call(Uuid::now_v7(), call).unwrap();
                let actual = handle.submit_and_wait(signed).await;

                match (expected, actual) {
                    (Ok(events), Ok(receipt)) => prop_assert_eq!(events, receipt.events),
                    (Err(e), Err(a)) => prop_assert_eq!(e, a),
                    (e, a) => prop_assert!(false, "ledger {:?} vs actor {:?}", e, a),
                }
            }

            let info = handle.token_info().await.unwrap();
            prop_assert_eq!(info.total_supply, reference.total_supply());
            for i in 0..ACCOUNTS {
                prop_assert_eq!(handle.balance_of(addr(i)).await.unwrap(), reference.balance_of(addr(i)));
            }

            handle.shutdown().await.unwrap();
            Ok(())
        })?;
    }
}
