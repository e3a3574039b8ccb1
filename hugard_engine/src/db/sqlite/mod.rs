//! # SQLite ledger backend
//!
//! Low-level SQLite interactions live in [`charges`] as plain functions that accept a `&mut SqliteConnection`.
//! Callers can obtain a connection from a pool, or open a transaction and pass `&mut *tx`, without any other changes.
//! [`SqliteDatabase`] ties those functions together into the [`crate::LedgerStore`] contract.
mod db;

pub mod charges;

pub use db::SqliteDatabase;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::db::traits::LedgerError;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, LedgerError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
