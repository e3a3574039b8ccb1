use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::LedgerStore,
    db_types::PayerTotal,
    hugard_api::{
        errors::ReportingError,
        report_objects::{PaymentHistory, ServerStats},
    },
};

/// Read-only aggregation over settled charges. Pending charges are never visible through this API.
pub struct ReportingApi<B> {
    db: B,
}

impl<B> Debug for ReportingApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReportingApi")
    }
}

impl<B> ReportingApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReportingApi<B>
where B: LedgerStore
{
    /// The settled payments of one payer, or `None` if they have not paid anything yet.
    pub async fn payment_history(&self, payer_id: &str) -> Result<Option<PaymentHistory>, ReportingError> {
        let payments = self.db.history(payer_id).await?;
        trace!("📊️ {} settled payments found for {payer_id}", payments.len());
        Ok(PaymentHistory::from_payments(payer_id, payments))
    }

    /// Settled totals per payer, largest first.
    pub async fn leaderboard(&self) -> Result<Vec<PayerTotal>, ReportingError> {
        let ranking = self.db.leaderboard().await?;
        Ok(ranking)
    }

    /// Community-wide statistics, or `None` if nothing has been settled yet.
    pub async fn server_stats(&self) -> Result<Option<ServerStats>, ReportingError> {
        let ranking = self.leaderboard().await?;
        trace!("📊️ Leaderboard has {} payers", ranking.len());
        Ok(ServerStats::from_leaderboard(ranking))
    }
}
