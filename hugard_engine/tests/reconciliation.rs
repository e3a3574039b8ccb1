use std::time::Duration;

use hugard_engine::{
    db_types::{ChargeStatus, PayerTotal},
    events::EventProducers,
    test_utils::{
        fakes::{FakeProvider, MemoryArtifacts},
        prepare_env::{prepare_test_env, random_db_path},
    },
    Cents,
    ChargeIssuerApi,
    ChargeOutcome,
    LedgerStore,
    ArtifactError,
    ChargeArtifacts,
    ProviderStatus,
    ReconciliationApi,
    ReportingApi,
    RequestedAmount,
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

struct Harness {
    db: SqliteDatabase,
    provider: FakeProvider,
    artifacts: MemoryArtifacts,
}

impl Harness {
    async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        Self { db, provider: FakeProvider::new(), artifacts: MemoryArtifacts::new() }
    }

    fn issuer(&self) -> ChargeIssuerApi<SqliteDatabase, FakeProvider, MemoryArtifacts> {
        ChargeIssuerApi::new(self.db.clone(), self.provider.clone(), self.artifacts.clone())
    }

    fn reconciler(&self) -> ReconciliationApi<SqliteDatabase, FakeProvider, MemoryArtifacts> {
        ReconciliationApi::new(
            self.db.clone(),
            self.provider.clone(),
            self.artifacts.clone(),
            EventProducers::default(),
        )
    }

    async fn request(&self, payer: &str, amount: &str) -> String {
        let amount = amount.parse::<RequestedAmount>().unwrap();
        self.issuer().issue_charge(payer, amount).await.expect("Error issuing charge").invoice_ref
    }

    async fn tear_down(mut self) {
        let url = self.db.url().to_string();
        if let Err(e) = self.db.close().await {
            error!("🚀️ Failed to close database: {e}");
        }
        Sqlite::drop_database(&url).await.unwrap();
    }
}

#[tokio::test]
async fn pending_charge_settles_once() {
    let h = Harness::new().await;
    let invoice = h.request("u1", "5").await;
    assert!(h.artifacts.contains(&invoice));

    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.checked, 1);
    assert_eq!(report.pending, vec![invoice.clone()]);
    assert!(report.settled.is_empty());

    h.provider.set_status(&invoice, ProviderStatus::Settled);
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![invoice.clone()]);
    let record = h.db.fetch_charge(&invoice).await.unwrap().unwrap();
    assert_eq!(record.status, ChargeStatus::Settled);
    assert_eq!(record.amount.value(), 500);
    assert!(!h.artifacts.contains(&invoice));

    // Settled charges are no longer polled
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.checked, 0);
    assert_eq!(h.provider.status_checks().iter().filter(|r| **r == invoice).count(), 2);
    h.tear_down().await;
}

#[tokio::test]
async fn charges_settle_in_different_cycles() {
    let h = Harness::new().await;
    let first = h.request("u1", "5").await;
    let second = h.request("u2", "7.50").await;

    h.provider.set_status(&second, ProviderStatus::Settled);
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![second.clone()]);
    assert_eq!(report.pending, vec![first.clone()]);

    h.provider.set_status(&first, ProviderStatus::Settled);
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![first.clone()]);
    assert!(h.db.list_pending().await.unwrap().is_empty());
    h.tear_down().await;
}

#[tokio::test]
async fn provider_failure_is_isolated() {
    let h = Harness::new().await;
    let a = h.request("u1", "2").await;
    let b = h.request("u2", "3").await;
    let c = h.request("u3", "4").await;
    for invoice in [&a, &b, &c] {
        h.provider.set_status(invoice, ProviderStatus::Settled);
    }
    h.provider.fail_checks_for(&b);

    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.checked, 3);
    assert_eq!(report.settled, vec![a.clone(), c.clone()]);
    assert_eq!(report.failed, vec![b.clone()]);
    let pending = h.db.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].invoice_ref, b);

    h.provider.recover(&b);
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![b]);
    h.tear_down().await;
}

#[tokio::test]
async fn non_settled_states_stay_pending() {
    let h = Harness::new().await;
    let invoice = h.request("u1", "5").await;
    let api = h.reconciler();
    for status in [
        ProviderStatus::Pending,
        ProviderStatus::Expired,
        ProviderStatus::Canceled,
        ProviderStatus::Other("UNRESOLVED".to_string()),
    ] {
        h.provider.set_status(&invoice, status.clone());
        let record = h.db.fetch_charge(&invoice).await.unwrap().unwrap();
        assert_eq!(api.reconcile_charge(record).await, ChargeOutcome::StillPending(status));
    }
    assert_eq!(h.db.list_pending().await.unwrap().len(), 1);
    h.tear_down().await;
}

#[tokio::test]
async fn hung_status_check_times_out() {
    let h = Harness::new().await;
    let slow = h.request("u1", "5").await;
    let fast = h.request("u2", "5").await;
    h.provider.set_status(&fast, ProviderStatus::Settled);
    h.provider.hang_checks_for(&slow);
    let api = h.reconciler().with_check_timeout(Duration::from_millis(100));
    let report = api.run_cycle().await.unwrap();
    assert_eq!(report.failed, vec![slow]);
    assert_eq!(report.settled, vec![fast]);
    h.tear_down().await;
}

#[tokio::test]
async fn second_settlement_is_a_no_op() {
    let h = Harness::new().await;
    let invoice = h.request("u1", "5").await;
    h.provider.set_status(&invoice, ProviderStatus::Settled);
    let record = h.db.fetch_charge(&invoice).await.unwrap().unwrap();
    let api = h.reconciler();
    assert_eq!(api.reconcile_charge(record.clone()).await, ChargeOutcome::Settled);
    // A stale snapshot from an overlapping cycle must not settle the charge twice
    assert_eq!(api.reconcile_charge(record).await, ChargeOutcome::AlreadySettled);
    h.tear_down().await;
}

#[tokio::test]
async fn one_payer_settling_across_cycles_is_reported_in_full() {
    let h = Harness::new().await;
    let reports = ReportingApi::new(h.db.clone());
    let first = h.request("u1", "5").await;
    let second = h.request("u1", "7.50").await;
    let other = h.request("u2", "10").await;
    assert!(reports.payment_history("u1").await.unwrap().is_none());
    assert!(reports.server_stats().await.unwrap().is_none());

    h.provider.set_status(&first, ProviderStatus::Settled);
    h.provider.set_status(&other, ProviderStatus::Settled);
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![first.clone(), other.clone()]);
    assert_eq!(report.pending, vec![second.clone()]);
    // u2 leads while half of u1's payments are still pending
    let stats = reports.server_stats().await.unwrap().unwrap();
    assert_eq!(stats.top_payer.payer_id, "u2");

    h.provider.set_status(&second, ProviderStatus::Settled);
    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![second.clone()]);

    let history = reports.payment_history("u1").await.unwrap().unwrap();
    assert_eq!(history.payments.len(), 2);
    let amounts = history.payments.iter().map(|p| p.amount.value()).collect::<Vec<_>>();
    assert_eq!(amounts, vec![500, 750]);
    assert_eq!(history.total, Cents::from(1250));

    let stats = reports.server_stats().await.unwrap().unwrap();
    assert_eq!(stats.top_payer, PayerTotal { payer_id: "u1".into(), total: Cents::from(1250) });
    assert_eq!(stats.ranking.iter().map(|p| p.payer_id.as_str()).collect::<Vec<_>>(), vec!["u1", "u2"]);
    assert_eq!(stats.payer_count, 2);
    assert_eq!(stats.total_income, Cents::from(2250));
    assert_eq!(stats.average_income, Cents::from(1125));
    h.tear_down().await;
}

/// Runs a full reconciliation cycle, with the charge already complete at the provider, before every render.
struct RacingArtifacts {
    inner: MemoryArtifacts,
    db: SqliteDatabase,
    provider: FakeProvider,
}

impl ChargeArtifacts for RacingArtifacts {
    async fn render(&self, invoice_ref: &str, payload: &str) -> Result<(), ArtifactError> {
        self.provider.set_status(invoice_ref, ProviderStatus::Settled);
        let api = ReconciliationApi::new(
            self.db.clone(),
            self.provider.clone(),
            self.inner.clone(),
            EventProducers::default(),
        );
        let report = api.run_cycle().await.expect("Error running cycle");
        assert!(report.settled.is_empty(), "{invoice_ref} settled before it was recorded");
        self.inner.render(invoice_ref, payload).await
    }

    async fn remove(&self, invoice_ref: &str) -> Result<(), ArtifactError> {
        self.inner.remove(invoice_ref).await
    }
}

#[tokio::test]
async fn artifact_exists_before_charge_is_visible() {
    let h = Harness::new().await;
    let racing = RacingArtifacts { inner: h.artifacts.clone(), db: h.db.clone(), provider: h.provider.clone() };
    let issuer = ChargeIssuerApi::new(h.db.clone(), h.provider.clone(), racing);
    let charge = issuer.issue_charge("u1", "5".parse().unwrap()).await.unwrap();
    let record = h.db.fetch_charge(&charge.invoice_ref).await.unwrap().unwrap();
    assert_eq!(record.status, ChargeStatus::New);
    assert!(h.artifacts.contains(&charge.invoice_ref));

    let report = h.reconciler().run_cycle().await.unwrap();
    assert_eq!(report.settled, vec![charge.invoice_ref.clone()]);
    assert!(!h.artifacts.contains(&charge.invoice_ref));
    h.tear_down().await;
}
