use std::time::Duration;

use hugard_engine::{events::EventProducers, CycleReport, ReconciliationApi, SqliteDatabase};
use log::*;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{integrations::coinbase::CoinbaseProvider, qr_codes::QrCodeStore};

/// Starts the reconciliation worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Cycles never overlap. If a cycle runs longer than `interval`, the next one starts as soon as it finishes, and the
/// schedule shifts rather than bursting to catch up.
pub fn start_reconciliation_worker(
    db: SqliteDatabase,
    provider: CoinbaseProvider,
    artifacts: QrCodeStore,
    producers: EventProducers,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let api = ReconciliationApi::new(db, provider, artifacts, producers);
        info!("🕰️ Reconciliation worker started. Polling every {interval:?}");
        loop {
            timer.tick().await;
            trace!("🕰️ Running reconciliation cycle");
            match api.run_cycle().await {
                Ok(report) => log_report(&report),
                Err(e) => {
                    error!("🕰️ Could not read the pending charges. Will retry next cycle. {e}");
                },
            }
        }
    })
}

fn log_report(report: &CycleReport) {
    if report.checked == 0 {
        trace!("🕰️ No pending charges");
        return;
    }
    info!(
        "🕰️ Checked {} charges. {} settled, {} pending, {} failed",
        report.checked,
        report.settled.len(),
        report.pending.len(),
        report.failed.len()
    );
    if !report.settled.is_empty() {
        debug!("🕰️ Settled: {}", report.settled.join(", "));
    }
    if !report.failed.is_empty() {
        debug!("🕰️ Failed: {}", report.failed.join(", "));
    }
}
