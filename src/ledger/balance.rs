use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{find_user, LedgerError};
use crate::db::statement::Statement;
use crate::db::{StatementRepository, UserRepository};

/// Net balance of a user together with the statements it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: Decimal,
    /// Statements in the order they were recorded.
    pub statement: Vec<Statement>,
}

/// Credits minus debits. The only place the sign rule is applied.
///
/// # Errors
///
/// [`LedgerError::BalanceOverflow`] if the running total leaves the range of
/// [`Decimal`].
pub fn balance_of<'a>(
    statements: impl IntoIterator<Item = &'a Statement>,
) -> Result<Decimal, LedgerError> {
    statements.into_iter().try_fold(Decimal::ZERO, |total, statement| {
        total
            .checked_add(statement.statement_type.signed(statement.amount))
            .ok_or(LedgerError::BalanceOverflow)
    })
}

/// Balance of `user_id` from everything recorded so far.
pub(crate) async fn current_balance(
    statements: &dyn StatementRepository,
    user_id: Uuid,
) -> Result<Decimal, LedgerError> {
    let recorded = statements.list_by_user_id(user_id).await?;
    balance_of(&recorded)
}

/// Rejects a credit that would push the balance out of range.
pub(crate) fn ensure_credit_fits(balance: Decimal, amount: Decimal) -> Result<(), LedgerError> {
    if balance.checked_add(amount).is_none() {
        tracing::warn!("Credit of {amount} rejected: balance {balance} would overflow");
        return Err(LedgerError::BalanceOverflow);
    }
    Ok(())
}

pub struct BalanceCalculator {
    statements: Arc<dyn StatementRepository>,
    users: Arc<dyn UserRepository>,
}

impl BalanceCalculator {
    pub fn new(statements: Arc<dyn StatementRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { statements, users }
    }

    pub async fn get_balance(&self, user_id: Uuid) -> Result<Balance, LedgerError> {
        find_user(self.users.as_ref(), user_id).await?;

        let statement = self.statements.list_by_user_id(user_id).await.inspect_err(|err| {
            tracing::error!("Failed to list statements for user {user_id}: {err}");
        })?;
        let balance = balance_of(&statement).inspect_err(|err| {
            tracing::error!("Balance for user {user_id} cannot be computed: {err}");
        })?;
        tracing::debug!("Balance for user {user_id}: {balance} over {} statements", statement.len());

        Ok(Balance { balance, statement })
    }
}
