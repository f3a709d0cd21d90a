use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::statement::{NewStatement, Statement, TransferStatements};
use super::user::User;
use super::{RepositoryError, StatementRepository, UserRepository};

const STATEMENT_COLUMNS: &str =
    "id, user_id, statement_type, amount, description, sender_id, created_at, updated_at";

// Database repository for account holders
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// Database repository for statements
pub struct PgStatementRepository {
    pool: PgPool,
}

impl PgStatementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_statement<'e, E>(executor: E, statement: NewStatement) -> Result<Statement, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let query = format!(
        r#"
        INSERT INTO statements (user_id, statement_type, amount, description, sender_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        STATEMENT_COLUMNS
    );

    sqlx::query_as::<_, Statement>(&query)
        .bind(statement.user_id)
        .bind(statement.statement_type)
        .bind(statement.amount)
        .bind(statement.description)
        .bind(statement.sender_id)
        .fetch_one(executor)
        .await
}

#[async_trait]
impl StatementRepository for PgStatementRepository {
    async fn insert(&self, statement: NewStatement) -> Result<Statement, RepositoryError> {
        let statement = insert_statement(&self.pool, statement).await?;
        tracing::debug!("statement {} stored", statement.id);
        Ok(statement)
    }

    async fn insert_transfer(
        &self,
        debit: NewStatement,
        credit: NewStatement,
    ) -> Result<TransferStatements, RepositoryError> {
        // Begin a database transaction; dropping it without commit rolls back
        let mut tx = self.pool.begin().await?;

        let debit_statement = insert_statement(&mut *tx, debit).await?;
        let credit_statement = insert_statement(&mut *tx, credit).await?;

        tx.commit().await?;
        tracing::debug!(
            "transfer pair stored: debit {} credit {}",
            debit_statement.id,
            credit_statement.id
        );

        Ok(TransferStatements {
            debit_statement,
            credit_statement,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Statement>, RepositoryError> {
        let query = format!("SELECT {} FROM statements WHERE id = $1", STATEMENT_COLUMNS);

        let statement = sqlx::query_as::<_, Statement>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(statement)
    }

    async fn list_by_user_id(&self, user_id: Uuid) -> Result<Vec<Statement>, RepositoryError> {
        // position is an identity column, so it reflects insertion order even
        // when two rows share a created_at
        let query = format!(
            "SELECT {} FROM statements WHERE user_id = $1 ORDER BY position",
            STATEMENT_COLUMNS
        );

        let statements = sqlx::query_as::<_, Statement>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(statements)
    }
}
