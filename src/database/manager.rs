use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Database temporarily unavailable")]
    Unavailable,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Fold a unique-constraint violation into `Conflict`, keep anything else.
    pub(crate) fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Conflict(what.into()),
            sqlx::Error::PoolTimedOut => DatabaseError::Unavailable,
            _ => DatabaseError::Sqlx(err),
        }
    }
}

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        full_name TEXT,
        email TEXT,
        hashed_password TEXT NOT NULL,
        disabled BOOLEAN NOT NULL DEFAULT FALSE,
        privilege INTEGER NOT NULL DEFAULT 1
    )
"#;

const CREATE_EMPLOYEES: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT PRIMARY KEY,
        first_name TEXT,
        last_name TEXT,
        patronymic TEXT,
        corp_email TEXT NOT NULL DEFAULT 'example@gmail.com',
        personal_email TEXT NOT NULL DEFAULT 'example@gmail.com',
        phone_number TEXT NOT NULL DEFAULT '+380000000000',
        country TEXT NOT NULL DEFAULT 'Ukraine',
        state TEXT,
        city TEXT,
        address TEXT,
        postcode TEXT,
        birthday DATE,
        start_date DATE NOT NULL DEFAULT CURRENT_DATE,
        end_date DATE,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_approved BOOLEAN NOT NULL DEFAULT TRUE
    )
"#;

/// Owns the Postgres connection pool
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Open a pool from configuration and make sure the tables exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database: {}", Self::redact(url)?);

        let manager = Self { pool };
        manager.ensure_schema().await?;
        Ok(manager)
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    /// Create the `users` and `employees` tables when missing.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_EMPLOYEES).execute(&self.pool).await?;
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Connection string with the password masked, for logs.
    fn redact(url: &str) -> Result<String, DatabaseError> {
        let mut parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if parsed.password().is_some() {
            parsed
                .set_password(Some("****"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(parsed.into())
    }
}
