//! In-memory repositories, used by tests and by embedders that do not need
//! durability.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use super::statement::{NewStatement, Statement, TransferStatements};
use super::user::User;
use super::{RepositoryError, StatementRepository, UserRepository};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns a copy of it.
    pub fn add(&self, user: User) -> User {
        self.users.insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }
}

/// Append-only statement log.
///
/// A single lock guards the whole log so a transfer pair is pushed inside one
/// write section and readers never see half of it.
#[derive(Debug, Default)]
pub struct InMemoryStatementRepository {
    statements: RwLock<Vec<Statement>>,
}

impl InMemoryStatementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.read().is_empty()
    }
}

#[async_trait]
impl StatementRepository for InMemoryStatementRepository {
    async fn insert(&self, statement: NewStatement) -> Result<Statement, RepositoryError> {
        let statement = statement.into_statement(Uuid::new_v4(), Utc::now());
        self.statements.write().push(statement.clone());
        Ok(statement)
    }

    async fn insert_transfer(
        &self,
        debit: NewStatement,
        credit: NewStatement,
    ) -> Result<TransferStatements, RepositoryError> {
        let now = Utc::now();
        let debit_statement = debit.into_statement(Uuid::new_v4(), now);
        let credit_statement = credit.into_statement(Uuid::new_v4(), now);

        let mut statements = self.statements.write();
        statements.push(debit_statement.clone());
        statements.push(credit_statement.clone());

        Ok(TransferStatements {
            debit_statement,
            credit_statement,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Statement>, RepositoryError> {
        Ok(self
            .statements
            .read()
            .iter()
            .find(|statement| statement.id == id)
            .cloned())
    }

    async fn list_by_user_id(&self, user_id: Uuid) -> Result<Vec<Statement>, RepositoryError> {
        Ok(self
            .statements
            .read()
            .iter()
            .filter(|statement| statement.user_id == user_id)
            .cloned()
            .collect())
    }
}
