use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::config::AppConfig;

/// Store failures that callers are expected to handle.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the field name.
    #[error("{0} already exists")]
    Duplicate(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("referenced {0} does not exist")]
    MissingReference(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(unique_field(db_err.constraint()).into());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(referenced_entity(db_err.constraint()).into());
            }
        }
        StoreError::Database(err)
    }
}

fn unique_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "email",
        _ => "record",
    }
}

fn referenced_entity(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("courses_user_id_fkey") => "user",
        _ => "record",
    }
}

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    Ok(())
}
