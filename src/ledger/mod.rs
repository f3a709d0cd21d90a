//! Ledger operations.
//!
//! - **Statements**: deposits and withdrawals on one account.
//! - **Transfers**: a debit/credit pair committed together.
//! - **Balance**: credits minus debits, recomputed on every call.
//! - **Statement operation**: one statement looked up by its owner.
//!
//! All components go through the same [`balance_of`] routine. Every write
//! goes through the same [`AccountLocks`] table so the balance checks and the
//! insert cannot interleave with another write to the same account.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::statement::{Statement, TransferStatements};
use crate::db::user::User;
use crate::db::{StatementRepository, UserRepository};

mod balance;
mod error;
mod locks;
mod operation;
mod statement;
mod transfer;

pub use balance::{balance_of, Balance, BalanceCalculator};
pub use error::LedgerError;
pub use locks::AccountLocks;
pub use operation::StatementLookup;
pub use statement::{CreateStatement, OperationType, StatementCreator};
pub use transfer::{CreateTransfer, TransferCreator};

pub(crate) async fn find_user(users: &dyn UserRepository, user_id: Uuid) -> Result<User, LedgerError> {
    match users.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!("User not found: {user_id}");
            Err(LedgerError::UserNotFound(user_id))
        }
    }
}

/// Largest number of decimal places an amount may carry.
pub const AMOUNT_SCALE: u32 = 4;

/// Amounts must stay strictly below this (the `NUMERIC(20, 4)` column range).
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

/// Rejects amounts every repository cannot store exactly.
pub(crate) fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO || amount >= AMOUNT_LIMIT || amount.normalize().scale() > AMOUNT_SCALE {
        tracing::warn!("Rejected amount: {amount}");
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}

/// Entry point wiring every operation over one pair of repositories.
pub struct Ledger {
    statement_creator: StatementCreator,
    transfer_creator: TransferCreator,
    balance_calculator: BalanceCalculator,
    statement_lookup: StatementLookup,
}

impl Ledger {
    pub fn new(users: Arc<dyn UserRepository>, statements: Arc<dyn StatementRepository>) -> Self {
        let locks = AccountLocks::new();

        Self {
            statement_creator: StatementCreator::new(
                Arc::clone(&users),
                Arc::clone(&statements),
                locks.clone(),
            ),
            transfer_creator: TransferCreator::new(Arc::clone(&users), Arc::clone(&statements), locks),
            balance_calculator: BalanceCalculator::new(Arc::clone(&statements), Arc::clone(&users)),
            statement_lookup: StatementLookup::new(users, statements),
        }
    }

    pub async fn create_statement(&self, request: CreateStatement) -> Result<Statement, LedgerError> {
        self.statement_creator.create(request).await
    }

    pub async fn create_transfer(
        &self,
        request: CreateTransfer,
    ) -> Result<TransferStatements, LedgerError> {
        self.transfer_creator.create(request).await
    }

    pub async fn get_balance(&self, user_id: Uuid) -> Result<Balance, LedgerError> {
        self.balance_calculator.get_balance(user_id).await
    }

    pub async fn get_statement_operation(
        &self,
        user_id: Uuid,
        statement_id: Uuid,
    ) -> Result<Statement, LedgerError> {
        self.statement_lookup.find(user_id, statement_id).await
    }
}
