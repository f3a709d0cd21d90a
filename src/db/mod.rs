//! Persistence ports and adapters.
//!
//! The ledger only talks to [`UserRepository`] and [`StatementRepository`];
//! [`memory`] and [`postgres`] provide interchangeable implementations.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
pub mod statement;
pub mod user;

use statement::{NewStatement, Statement, TransferStatements};
use user::User;

/// Storage failure reported by a repository adapter.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait StatementRepository: Send + Sync {
    /// Persists one statement and returns it with its assigned id.
    async fn insert(&self, statement: NewStatement) -> Result<Statement, RepositoryError>;

    /// Persists both sides of a transfer as a single unit: a reader observes
    /// either both statements or neither.
    async fn insert_transfer(
        &self,
        debit: NewStatement,
        credit: NewStatement,
    ) -> Result<TransferStatements, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Statement>, RepositoryError>;

    /// All statements of a user in insertion order.
    async fn list_by_user_id(&self, user_id: Uuid) -> Result<Vec<Statement>, RepositoryError>;
}
