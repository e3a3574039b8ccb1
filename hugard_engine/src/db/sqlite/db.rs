use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqlitePool};

use super::{charges, new_pool};
use crate::{
    db::traits::{LedgerError, LedgerStore},
    db_types::{ChargeRecord, ChargeStatus, NewChargeRecord, PayerTotal, SettledPayment},
};

/// `SqliteDatabase` is the SQLite implementation of the ledger.
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl LedgerStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create(&self, charge: NewChargeRecord) -> Result<ChargeRecord, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let record = charges::insert_charge(charge, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Charge {} for {} from payer {} saved with id {}",
            record.invoice_ref, record.amount, record.payer_id, record.id
        );
        Ok(record)
    }

    async fn list_pending(&self) -> Result<Vec<ChargeRecord>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let pending = charges::fetch_charges_with_status(ChargeStatus::New, &mut conn).await?;
        trace!("🗃️ {} charges are pending", pending.len());
        Ok(pending)
    }

    async fn mark_settled(&self, invoice_ref: &str) -> Result<bool, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let settled = charges::settle_charge(invoice_ref, &mut tx).await?;
        tx.commit().await?;
        if settled {
            debug!("🗃️ Charge {invoice_ref} marked as settled");
        } else {
            debug!("🗃️ Charge {invoice_ref} is unknown or already settled. No action taken");
        }
        Ok(settled)
    }

    async fn fetch_charge(&self, invoice_ref: &str) -> Result<Option<ChargeRecord>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        charges::fetch_charge(invoice_ref, &mut conn).await
    }

    async fn history(&self, payer_id: &str) -> Result<Vec<SettledPayment>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        charges::settled_history(payer_id, &mut conn).await
    }

    async fn leaderboard(&self) -> Result<Vec<PayerTotal>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        charges::settled_totals(&mut conn).await
    }

    async fn close(&mut self) -> Result<(), LedgerError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, LedgerError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date using the migrations embedded in this crate.
    pub async fn migrate(&self) -> Result<(), LedgerError> {
        migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
