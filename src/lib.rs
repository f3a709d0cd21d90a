//! Statement ledger core.
//!
//! Records deposits, withdrawals and transfers as immutable statements and
//! derives balances from them on demand.
//!
//! - [`db`]: statement/user models, repository ports and their in-memory and
//!   Postgres adapters
//! - [`ledger`]: the operations (create statement, create transfer, get
//!   balance, get statement operation) and their error type
//! - [`config`] / [`telemetry`]: environment configuration and tracing setup
//!   used by the binary
//!
//! ```
//! use std::sync::Arc;
//! use rust_decimal_macros::dec;
//! use statement_ledger::db::memory::{InMemoryStatementRepository, InMemoryUserRepository};
//! use statement_ledger::db::user::User;
//! use statement_ledger::{CreateStatement, Ledger, OperationType};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let users = Arc::new(InMemoryUserRepository::new());
//! let user = users.add(User::new("ana@example.com", None));
//! let ledger = Ledger::new(users, Arc::new(InMemoryStatementRepository::new()));
//!
//! ledger
//!     .create_statement(CreateStatement {
//!         user_id: user.id,
//!         operation: OperationType::Deposit,
//!         amount: dec!(500),
//!         description: "salary".to_string(),
//!     })
//!     .await
//!     .unwrap();
//!
//! let balance = ledger.get_balance(user.id).await.unwrap();
//! assert_eq!(balance.balance, dec!(500));
//! # });
//! ```

pub mod config;
pub mod db;
pub mod ledger;
pub mod telemetry;

pub use db::statement::{NewStatement, Statement, StatementType, TransferStatements};
pub use db::user::User;
pub use db::{RepositoryError, StatementRepository, UserRepository};
pub use ledger::{
    balance_of, AccountLocks, Balance, BalanceCalculator, CreateStatement, CreateTransfer, Ledger,
    LedgerError, OperationType, StatementCreator, StatementLookup, TransferCreator, AMOUNT_LIMIT,
    AMOUNT_SCALE,
};
