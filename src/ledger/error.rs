//! Error types for ledger operations.

use thiserror::Error;
use uuid::Uuid;

use crate::db::RepositoryError;

/// Ledger operation errors.
///
/// Every validation variant is raised before anything is written.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// No user resolves for the given id
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    /// Amount is not positive, has more than four decimal places, or is
    /// too large to store
    #[error("invalid amount (must be positive, at most 4 decimal places and below 10^16)")]
    InvalidAmount,

    /// Balance would no longer be representable
    #[error("balance out of range")]
    BalanceOverflow,

    /// Withdrawal or transfer would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Sender and receiver of a transfer are the same account
    #[error("cannot transfer to the same account")]
    SelfTransfer,

    /// Statement does not exist or belongs to another user
    #[error("statement {0} not found")]
    StatementNotFound(Uuid),

    /// Storage failure, passed through untouched
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
