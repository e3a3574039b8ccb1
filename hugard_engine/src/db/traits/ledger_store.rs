use thiserror::Error;

use crate::db_types::{ChargeRecord, NewChargeRecord, PayerTotal, SettledPayment};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database driver error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Invoice {0} has already been recorded")]
    DuplicateInvoice(String),
    #[error("Database query error: {0}")]
    QueryError(String),
}

/// This trait defines the behaviour of a durable store of charge records.
///
/// Implementations must make `create` and `mark_settled` atomic: concurrent readers never see a half-written record,
/// and concurrent `mark_settled` calls for the same invoice never both report a transition.
#[allow(async_fn_in_trait)]
pub trait LedgerStore: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Inserts a new `NEW` record with a fresh id and the current timestamp.
    ///
    /// Returns [`LedgerError::DuplicateInvoice`] if the invoice reference has already been recorded. In that case the
    /// ledger is left unchanged.
    async fn create(&self, charge: NewChargeRecord) -> Result<ChargeRecord, LedgerError>;

    /// Returns a snapshot of every record that has not been settled yet, in no particular order.
    async fn list_pending(&self) -> Result<Vec<ChargeRecord>, LedgerError>;

    /// Atomically moves the record for `invoice_ref` from `NEW` to `SETTLED`.
    ///
    /// Returns `true` only for the call that performed the transition. If the record is already settled, or does not
    /// exist, nothing changes and `false` is returned. Callers gate every settlement side effect on a `true` result.
    async fn mark_settled(&self, invoice_ref: &str) -> Result<bool, LedgerError>;

    /// Fetches a single record by its invoice reference.
    async fn fetch_charge(&self, invoice_ref: &str) -> Result<Option<ChargeRecord>, LedgerError>;

    /// All settled payments for the given payer, oldest first.
    async fn history(&self, payer_id: &str) -> Result<Vec<SettledPayment>, LedgerError>;

    /// Settled totals grouped by payer, largest total first. Empty if nothing has been settled yet.
    async fn leaderboard(&self) -> Result<Vec<PayerTotal>, LedgerError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }
}
