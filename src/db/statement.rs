use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Statement {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub statement_type: StatementType,
    pub amount: Decimal,
    pub description: String,
    /// Counterpart account of a transfer statement, despite the column name.
    /// On a `TRANSFER_CREDIT` this is the sending account; on a
    /// `TRANSFER_DEBIT` it holds the receiving account. `None` for deposits
    /// and withdrawals.
    pub sender_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "statement_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementType {
    Deposit,
    Withdraw,
    TransferCredit,
    TransferDebit,
}

impl StatementType {
    /// Applies the direction of this kind to a positive magnitude.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            StatementType::Deposit | StatementType::TransferCredit => amount,
            StatementType::Withdraw | StatementType::TransferDebit => -amount,
        }
    }
}

/// A statement that has not been persisted yet; the repository assigns
/// `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatement {
    pub user_id: Uuid,
    pub statement_type: StatementType,
    pub amount: Decimal,
    pub description: String,
    pub sender_id: Option<Uuid>,
}

impl NewStatement {
    pub(crate) fn into_statement(self, id: Uuid, now: DateTime<Utc>) -> Statement {
        Statement {
            id,
            user_id: self.user_id,
            statement_type: self.statement_type,
            amount: self.amount,
            description: self.description,
            sender_id: self.sender_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Both sides of a transfer, as committed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStatements {
    pub debit_statement: Statement,
    pub credit_statement: Statement,
}
