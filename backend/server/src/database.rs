//! # SQLite
//!
//! Relational store for the menu, inventory, schedules, batches and orders.
//!
//! The storefront writes customers and orders, the admin side owns everything
//! else. Both talk to the same file.
//!
//! ## Requirements
//!
//! - Small dataset, a menu of tens of items and a few hundred orders per batch
//! - Parameterized statements only
//! - Cascading deletes from menu items to inventory and schedules, and from
//!   batches to their inventory snapshot
//!
//! ## Implementation
//!
//! - Schema lives in `migrations/` and is applied at startup
//! - Foreign keys must be switched on per connection in SQLite
//! - WAL journal so storefront reads don't block admin writes
//! - `sqlite::memory:` collapses the pool to one long-lived connection, every
//!   other connection would see its own empty database
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;

pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database url {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
    }
    .connect_with(options)
    .await
    .context("Failed to open database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    info!("Database ready at {database_url}");

    Ok(pool)
}
