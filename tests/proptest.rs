//! Property-based tests for the ledger.
//!
//! These verify invariants that should hold for any sequence of operations.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use statement_ledger::db::memory::{InMemoryStatementRepository, InMemoryUserRepository};
use statement_ledger::{
    balance_of, CreateStatement, CreateTransfer, Ledger, LedgerError, OperationType, User,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.01 to 100000.00).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

#[derive(Debug, Clone)]
enum Op {
    Deposit(usize, Decimal),
    Withdraw(usize, Decimal),
    Transfer(usize, usize, Decimal),
}

fn arb_op(users: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..users, arb_amount()).prop_map(|(u, a)| Op::Deposit(u, a)),
        (0..users, arb_amount()).prop_map(|(u, a)| Op::Withdraw(u, a)),
        (0..users, 0..users, arb_amount()).prop_map(|(s, r, a)| Op::Transfer(s, r, a)),
    ]
}

fn setup(users: usize) -> (Ledger, Vec<Uuid>) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let ids = (0..users)
        .map(|i| repo.add(User::new(format!("user{i}@example.com"), None)).id)
        .collect();
    (Ledger::new(repo, Arc::new(InMemoryStatementRepository::new())), ids)
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn apply(ledger: &Ledger, ids: &[Uuid], op: &Op) -> Result<(), LedgerError> {
    match *op {
        Op::Deposit(u, amount) => ledger
            .create_statement(CreateStatement {
                user_id: ids[u],
                operation: OperationType::Deposit,
                amount,
                description: String::new(),
            })
            .await
            .map(|_| ()),
        Op::Withdraw(u, amount) => ledger
            .create_statement(CreateStatement {
                user_id: ids[u],
                operation: OperationType::Withdraw,
                amount,
                description: String::new(),
            })
            .await
            .map(|_| ()),
        Op::Transfer(s, r, amount) => ledger
            .create_transfer(CreateTransfer {
                sender_id: ids[s],
                receiver_id: ids[r],
                amount,
                description: String::new(),
            })
            .await
            .map(|_| ()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A single deposit on a fresh account is the whole balance.
    #[test]
    fn deposit_on_fresh_account_is_balance(amount in arb_amount()) {
        let (ledger, ids) = setup(1);
        let balance = runtime().block_on(async {
            ledger
                .create_statement(CreateStatement {
                    user_id: ids[0],
                    operation: OperationType::Deposit,
                    amount,
                    description: String::new(),
                })
                .await
                .unwrap();
            ledger.get_balance(ids[0]).await.unwrap().balance
        });
        prop_assert_eq!(balance, amount);
    }

    /// Withdrawals succeed exactly when covered and subtract exactly.
    #[test]
    fn withdrawal_matches_funds_check(deposit in arb_amount(), withdraw in arb_amount()) {
        let (ledger, ids) = setup(1);
        let user = ids[0];
        let (result, after) = runtime().block_on(async {
            ledger
                .create_statement(CreateStatement {
                    user_id: user,
                    operation: OperationType::Deposit,
                    amount: deposit,
                    description: String::new(),
                })
                .await
                .unwrap();
            let result = ledger
                .create_statement(CreateStatement {
                    user_id: user,
                    operation: OperationType::Withdraw,
                    amount: withdraw,
                    description: String::new(),
                })
                .await;
            (result, ledger.get_balance(user).await.unwrap().balance)
        });

        if withdraw <= deposit {
            prop_assert!(result.is_ok());
            prop_assert_eq!(after, deposit - withdraw);
        } else {
            prop_assert!(matches!(result, Err(LedgerError::InsufficientFunds)));
            prop_assert_eq!(after, deposit);
        }
    }

    /// Transfers never create or destroy money, and no balance goes negative.
    #[test]
    fn operations_preserve_ledger_invariants(ops in prop::collection::vec(arb_op(3), 1..40)) {
        let (ledger, ids) = setup(3);
        let rt = runtime();

        let mut deposited = Decimal::ZERO;
        let mut withdrawn = Decimal::ZERO;
        for op in &ops {
            let result = rt.block_on(apply(&ledger, &ids, op));
            match (op, &result) {
                (Op::Deposit(_, amount), Ok(())) => deposited += *amount,
                (Op::Withdraw(_, amount), Ok(())) => withdrawn += *amount,
                (Op::Transfer(s, r, _), Err(LedgerError::SelfTransfer)) => prop_assert_eq!(s, r),
                (Op::Transfer(s, r, _), Ok(())) => prop_assert_ne!(s, r),
                (_, Err(LedgerError::InsufficientFunds)) => {}
                (_, other) => prop_assert!(false, "unexpected result {:?}", other),
            }
        }

        let mut total = Decimal::ZERO;
        for id in &ids {
            let balance = rt.block_on(ledger.get_balance(*id)).unwrap();
            prop_assert!(balance.balance >= Decimal::ZERO);
            prop_assert_eq!(balance.balance, balance_of(&balance.statement).unwrap());
            total += balance.balance;
        }
        prop_assert_eq!(total, deposited - withdrawn);
    }

    /// Reading a balance has no effect on later reads.
    #[test]
    fn balance_reads_are_idempotent(ops in prop::collection::vec(arb_op(2), 0..20)) {
        let (ledger, ids) = setup(2);
        let rt = runtime();
        for op in &ops {
            let _ = rt.block_on(apply(&ledger, &ids, op));
        }

        let first = rt.block_on(ledger.get_balance(ids[0])).unwrap();
        let second = rt.block_on(ledger.get_balance(ids[0])).unwrap();
        prop_assert_eq!(first, second);
    }
}
