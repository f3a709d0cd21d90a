use std::sync::Arc;

use uuid::Uuid;

use super::{find_user, LedgerError};
use crate::db::statement::Statement;
use crate::db::{StatementRepository, UserRepository};

/// Fetches a single statement on behalf of its owner.
pub struct StatementLookup {
    users: Arc<dyn UserRepository>,
    statements: Arc<dyn StatementRepository>,
}

impl StatementLookup {
    pub fn new(users: Arc<dyn UserRepository>, statements: Arc<dyn StatementRepository>) -> Self {
        Self { users, statements }
    }

    /// A statement owned by someone else is reported as missing.
    pub async fn find(&self, user_id: Uuid, statement_id: Uuid) -> Result<Statement, LedgerError> {
        find_user(self.users.as_ref(), user_id).await?;

        match self.statements.find_by_id(statement_id).await? {
            Some(statement) if statement.user_id == user_id => Ok(statement),
            Some(_) => {
                tracing::warn!("User {user_id} requested statement {statement_id} of another user");
                Err(LedgerError::StatementNotFound(statement_id))
            }
            None => Err(LedgerError::StatementNotFound(statement_id)),
        }
    }
}
