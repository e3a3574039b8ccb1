use hugard_common::Cents;
use serde::{Deserialize, Serialize};

use crate::db_types::{PayerTotal, SettledPayment};

/// Settled payments for a single payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHistory {
    pub payer_id: String,
    pub payments: Vec<SettledPayment>,
    pub total: Cents,
}

impl PaymentHistory {
    /// Returns `None` when there are no payments, so that "no data" is never confused with a zero total.
    pub fn from_payments(payer_id: &str, payments: Vec<SettledPayment>) -> Option<Self> {
        if payments.is_empty() {
            return None;
        }
        let total = payments.iter().map(|p| p.amount).sum();
        Some(Self { payer_id: payer_id.to_string(), payments, total })
    }
}

/// Community-wide statistics over settled payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStats {
    pub total_income: Cents,
    /// Total income divided by the number of distinct payers
    pub average_income: Cents,
    pub payer_count: usize,
    pub top_payer: PayerTotal,
    /// Every payer, largest total first
    pub ranking: Vec<PayerTotal>,
}

impl ServerStats {
    /// Builds the statistics from a leaderboard that is already sorted by total, descending. Returns `None` for an
    /// empty leaderboard.
    pub fn from_leaderboard(ranking: Vec<PayerTotal>) -> Option<Self> {
        let top_payer = ranking.first()?.clone();
        let total_income: Cents = ranking.iter().map(|p| p.total).sum();
        let payer_count = ranking.len();
        let average_income = total_income.checked_average(payer_count)?;
        Some(Self { total_income, average_income, payer_count, top_payer, ranking })
    }
}
