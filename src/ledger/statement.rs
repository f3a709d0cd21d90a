use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::balance::{current_balance, ensure_credit_fits};
use super::locks::AccountLocks;
use super::{find_user, validate_amount, LedgerError};
use crate::db::statement::{NewStatement, Statement, StatementType};
use crate::db::{StatementRepository, UserRepository};

/// Single-account movements. Transfers go through
/// [`TransferCreator`](super::TransferCreator) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl From<OperationType> for StatementType {
    fn from(operation: OperationType) -> Self {
        match operation {
            OperationType::Deposit => StatementType::Deposit,
            OperationType::Withdraw => StatementType::Withdraw,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStatement {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub operation: OperationType,
    pub amount: Decimal,
    pub description: String,
}

pub struct StatementCreator {
    users: Arc<dyn UserRepository>,
    statements: Arc<dyn StatementRepository>,
    locks: AccountLocks,
}

impl StatementCreator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        statements: Arc<dyn StatementRepository>,
        locks: AccountLocks,
    ) -> Self {
        Self {
            users,
            statements,
            locks,
        }
    }

    /// Records a deposit or a withdrawal.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UserNotFound`] - the user does not exist.
    /// - [`LedgerError::InvalidAmount`] - amount is not positive or not storable.
    /// - [`LedgerError::InsufficientFunds`] - withdrawal exceeds the balance.
    /// - [`LedgerError::BalanceOverflow`] - deposit would leave the balance
    ///   out of range.
    /// - [`LedgerError::Repository`] - storage failure.
    pub async fn create(&self, request: CreateStatement) -> Result<Statement, LedgerError> {
        let CreateStatement {
            user_id,
            operation,
            amount,
            description,
        } = request;

        find_user(self.users.as_ref(), user_id).await?;
        validate_amount(amount)?;

        // Held until the insert completes so concurrent writers see each other
        let _guard = self.locks.lock(user_id).await;

        let balance = current_balance(self.statements.as_ref(), user_id).await?;
        match operation {
            OperationType::Withdraw if amount > balance => {
                tracing::warn!(
                    "Withdrawal of {amount} rejected for user {user_id}: balance is {balance}"
                );
                return Err(LedgerError::InsufficientFunds);
            }
            OperationType::Withdraw => {}
            OperationType::Deposit => ensure_credit_fits(balance, amount)?,
        }

        let statement = self
            .statements
            .insert(NewStatement {
                user_id,
                statement_type: operation.into(),
                amount,
                description,
                sender_id: None,
            })
            .await
            .inspect_err(|err| tracing::error!("Failed to store statement for user {user_id}: {err}"))?;

        tracing::info!(
            "Statement {} ({:?} of {amount}) created for user {user_id}",
            statement.id,
            operation
        );
        Ok(statement)
    }
}
