use std::process::ExitCode;
use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use statement_ledger::config::Config;
use statement_ledger::db::postgres::{PgStatementRepository, PgUserRepository};
use statement_ledger::{telemetry, Ledger};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // dropped at the end of main so buffered log lines are flushed
    let _guards = match telemetry::init(&config.log_file) {
        Ok(guards) => guards,
        Err(err) => {
            eprintln!("Unable to set global subscriber: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(config, std::env::args().nth(1)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, audit_user: Option<String>) -> Result<(), String> {
    let database_pool = process_database(&config.database_url, config.max_connection_pooling).await?;
    tracing::info!("Connected to database");

    let ledger = process_begin(database_pool);
    tracing::info!("Ledger ready");

    // optional audit: log the balance of the user given as first argument
    let Some(arg) = audit_user else {
        return Ok(());
    };
    let user_id = Uuid::parse_str(&arg).map_err(|err| format!("Invalid user id {arg:?}: {err}"))?;

    let balance = ledger
        .get_balance(user_id)
        .await
        .map_err(|err| format!("Failed to get balance for user {user_id}: {err}"))?;
    tracing::info!(
        "Balance for user {user_id}: {} ({} statements)",
        balance.balance,
        balance.statement.len()
    );

    Ok(())
}

fn process_begin(db_pool: PgPool) -> Ledger {
    let users = Arc::new(PgUserRepository::new(db_pool.clone()));
    let statements = Arc::new(PgStatementRepository::new(db_pool));

    Ledger::new(users, statements)
}

async fn process_database(url: &str, max_conn_pool: u32) -> Result<PgPool, String> {
    // create a connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(max_conn_pool)
        .connect(url)
        .await
        .map_err(|err| format!("Failed to connect to database: {}", err))?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|err| format!("Failed to run migrations: {}", err))?;
    tracing::info!("Migrations run successfully");

    Ok(db_pool)
}
