use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::balance::{current_balance, ensure_credit_fits};
use super::locks::AccountLocks;
use super::{find_user, validate_amount, LedgerError};
use crate::db::statement::{NewStatement, StatementType, TransferStatements};
use crate::db::{StatementRepository, UserRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransfer {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Decimal,
    pub description: String,
}

pub struct TransferCreator {
    users: Arc<dyn UserRepository>,
    statements: Arc<dyn StatementRepository>,
    locks: AccountLocks,
}

impl TransferCreator {
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

    /// Moves `amount` from the sender to the receiver.
    ///
    /// Writes a `TRANSFER_DEBIT` on the sender and a `TRANSFER_CREDIT` on the
    /// receiver in one repository call. Each side records the other account
    /// as its counterpart.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UserNotFound`] - sender or receiver does not exist.
    /// - [`LedgerError::SelfTransfer`] - sender and receiver are the same.
    /// - [`LedgerError::InvalidAmount`] - amount is not positive or not storable.
    /// - [`LedgerError::InsufficientFunds`] - amount exceeds the sender balance.
    /// - [`LedgerError::BalanceOverflow`] - the credit would leave the receiver
    ///   balance out of range.
    /// - [`LedgerError::Repository`] - storage failure; nothing was written.
    pub async fn create(&self, request: CreateTransfer) -> Result<TransferStatements, LedgerError> {
        let CreateTransfer {
            sender_id,
            receiver_id,
            amount,
            description,
        } = request;

        futures::try_join!(
            find_user(self.users.as_ref(), sender_id),
            find_user(self.users.as_ref(), receiver_id),
        )?;

        if sender_id == receiver_id {
            tracing::warn!("Transfer rejected: user {sender_id} tried to transfer to itself");
            return Err(LedgerError::SelfTransfer);
        }
        validate_amount(amount)?;

        // Both balances are checked, so both accounts stay locked until the pair is stored
        let _guards = self.locks.lock_pair(sender_id, receiver_id).await;

        let (balance, receiver_balance) = futures::try_join!(
            current_balance(self.statements.as_ref(), sender_id),
            current_balance(self.statements.as_ref(), receiver_id),
        )?;
        if amount > balance {
            tracing::warn!(
                "Transfer of {amount} from {sender_id} to {receiver_id} rejected: balance is {balance}"
            );
            return Err(LedgerError::InsufficientFunds);
        }
        ensure_credit_fits(receiver_balance, amount)?;

        let debit = NewStatement {
            user_id: sender_id,
            statement_type: StatementType::TransferDebit,
            amount,
            description: description.clone(),
            sender_id: Some(receiver_id),
        };
        let credit = NewStatement {
            user_id: receiver_id,
            statement_type: StatementType::TransferCredit,
            amount,
            description,
            sender_id: Some(sender_id),
        };

        let transfer = self
            .statements
            .insert_transfer(debit, credit)
            .await
            .inspect_err(|err| {
                tracing::error!("Failed to store transfer from {sender_id} to {receiver_id}: {err}")
            })?;

        tracing::info!(
            "Transfer of {amount} from {sender_id} to {receiver_id} created: debit {} credit {}",
            transfer.debit_statement.id,
            transfer.credit_statement.id
        );
        Ok(transfer)
    }
}
