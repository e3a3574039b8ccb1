use std::{fmt::Debug, time::Duration};

use log::*;
use serde::Serialize;

use crate::{
    db::traits::LedgerStore,
    db_types::{ChargeRecord, ChargeStatus},
    events::{EventProducers, PaymentSettledEvent},
    hugard_api::errors::ReconciliationError,
    traits::{ChargeArtifacts, PaymentProvider, ProviderStatus},
};

/// Default upper bound on a single status check. It stays below the default polling interval, so one hung request
/// can never hold up the next cycle.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(25);

/// The result of reconciling a single pending charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// The provider has not settled the charge yet.
    StillPending(ProviderStatus),
    /// This pass moved the charge to `SETTLED` and published the settlement event.
    Settled,
    /// The provider reports the charge as settled, but another pass got there first. Nothing was emitted.
    AlreadySettled,
    /// The status check or the ledger update failed. The charge stays `NEW` and is retried next cycle.
    Failed(String),
}

/// Summary of one reconciliation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub checked: usize,
    pub settled: Vec<String>,
    pub pending: Vec<String>,
    pub failed: Vec<String>,
}

impl CycleReport {
    fn record(&mut self, invoice_ref: String, outcome: &ChargeOutcome) {
        self.checked += 1;
        match outcome {
            ChargeOutcome::Settled => self.settled.push(invoice_ref),
            ChargeOutcome::StillPending(_) | ChargeOutcome::AlreadySettled => self.pending.push(invoice_ref),
            ChargeOutcome::Failed(_) => self.failed.push(invoice_ref),
        }
    }
}

/// `ReconciliationApi` brings the ledger in line with the payment provider.
///
/// Each cycle takes a fresh snapshot of the pending charges from the ledger, so nothing is lost across restarts. Every
/// charge is checked independently: a failure for one invoice is logged and never prevents the others from being
/// evaluated. Settlement side effects (artifact removal and the settlement event) only happen when
/// [`LedgerStore::mark_settled`] reports that *this* call performed the transition, which is what guarantees exactly
/// one notification per settled charge.
pub struct ReconciliationApi<B, P, A> {
    db: B,
    provider: P,
    artifacts: A,
    producers: EventProducers,
    check_timeout: Duration,
}

impl<B, P, A> Debug for ReconciliationApi<B, P, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi (timeout {:?})", self.check_timeout)
    }
}

impl<B, P, A> ReconciliationApi<B, P, A> {
    pub fn new(db: B, provider: P, artifacts: A, producers: EventProducers) -> Self {
        Self { db, provider, artifacts, producers, check_timeout: DEFAULT_CHECK_TIMEOUT }
    }

    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }
}

impl<B, P, A> ReconciliationApi<B, P, A>
where
    B: LedgerStore,
    P: PaymentProvider,
    A: ChargeArtifacts,
{
    /// Runs one reconciliation cycle over every pending charge.
    ///
    /// Only a failure to read the pending set is returned as an error. Per-charge failures are reported in the
    /// [`CycleReport`].
    pub async fn run_cycle(&self) -> Result<CycleReport, ReconciliationError> {
        let pending = self.db.list_pending().await?;
        trace!("🔄️ Reconciling {} pending charges", pending.len());
        let mut report = CycleReport::default();
        for record in pending {
            let invoice_ref = record.invoice_ref.clone();
            let outcome = self.reconcile_charge(record).await;
            report.record(invoice_ref, &outcome);
        }
        Ok(report)
    }

    /// Checks a single charge against the provider and applies the settlement transition if it has cleared.
    pub async fn reconcile_charge(&self, record: ChargeRecord) -> ChargeOutcome {
        let invoice_ref = record.invoice_ref.as_str();
        let status = match tokio::time::timeout(self.check_timeout, self.provider.charge_status(invoice_ref)).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                warn!("🔄️ Could not fetch the status for invoice {invoice_ref}. Will retry next cycle. {e}");
                return ChargeOutcome::Failed(e.to_string());
            },
            Err(_) => {
                warn!(
                    "🔄️ Status check for invoice {invoice_ref} timed out after {:?}. Will retry next cycle.",
                    self.check_timeout
                );
                return ChargeOutcome::Failed("Status check timed out".to_string());
            },
        };
        if !status.is_settled() {
            trace!("🔄️ Invoice {invoice_ref} is {status}");
            return ChargeOutcome::StillPending(status);
        }
        match self.db.mark_settled(invoice_ref).await {
            Ok(true) => {
                info!("🔄️ Invoice {invoice_ref} for {} from {} has settled", record.amount, record.payer_id);
                if let Err(e) = self.artifacts.remove(invoice_ref).await {
                    warn!("🔄️ Could not remove the payment code for {invoice_ref}. {e}");
                }
                self.call_payment_settled_hook(&record).await;
                ChargeOutcome::Settled
            },
            Ok(false) => {
                debug!("🔄️ Invoice {invoice_ref} was already settled. Skipping notification");
                ChargeOutcome::AlreadySettled
            },
            Err(e) => {
                error!("🔄️ Invoice {invoice_ref} has settled, but the ledger could not be updated. {e}");
                ChargeOutcome::Failed(e.to_string())
            },
        }
    }

    async fn call_payment_settled_hook(&self, record: &ChargeRecord) {
        let mut settled = record.clone();
        settled.status = ChargeStatus::Settled;
        for emitter in &self.producers.payment_settled_producer {
            debug!("🔄️ Notifying payment settled hook subscribers");
            emitter.publish_event(PaymentSettledEvent::new(settled.clone())).await;
        }
    }
}
