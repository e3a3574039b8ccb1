use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
        Mutex,
    },
    time::Duration,
};

use hugard_common::Cents;

use crate::traits::{ArtifactError, ChargeArtifacts, PaymentProvider, ProviderError, ProviderStatus};

#[derive(Default)]
struct ProviderState {
    statuses: HashMap<String, ProviderStatus>,
    failing: HashSet<String>,
    slow: HashSet<String>,
    refuse_charges: bool,
    next_ref: Option<String>,
    status_checks: Vec<String>,
    charge_requests: Vec<(String, Cents)>,
}

/// An in-memory payment processor. Charges start as `New`; tests move them along with [`FakeProvider::set_status`].
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<ProviderState>>,
    counter: Arc<AtomicU64>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, invoice_ref: &str, status: ProviderStatus) {
        self.state.lock().unwrap().statuses.insert(invoice_ref.to_string(), status);
    }

    /// Status checks for `invoice_ref` return an error until [`FakeProvider::recover`] is called.
    pub fn fail_checks_for(&self, invoice_ref: &str) {
        self.state.lock().unwrap().failing.insert(invoice_ref.to_string());
    }

    pub fn recover(&self, invoice_ref: &str) {
        self.state.lock().unwrap().failing.remove(invoice_ref);
    }

    /// Status checks for `invoice_ref` hang for a minute.
    pub fn hang_checks_for(&self, invoice_ref: &str) {
        self.state.lock().unwrap().slow.insert(invoice_ref.to_string());
    }

    pub fn refuse_charges(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_charges = refuse;
    }

    /// Forces the identifier handed out by the next `create_charge` call.
    pub fn use_next_ref(&self, invoice_ref: &str) {
        self.state.lock().unwrap().next_ref = Some(invoice_ref.to_string());
    }

    pub fn status_checks(&self) -> Vec<String> {
        self.state.lock().unwrap().status_checks.clone()
    }

    /// Every `create_charge` call as `(payer_id, amount)`, including refused ones.
    pub fn charge_requests(&self) -> Vec<(String, Cents)> {
        self.state.lock().unwrap().charge_requests.clone()
    }
}

impl PaymentProvider for FakeProvider {
    async fn create_charge(&self, payer_id: &str, amount: Cents) -> Result<String, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.charge_requests.push((payer_id.to_string(), amount));
        if state.refuse_charges {
            return Err(ProviderError::Unavailable("503 Service Unavailable".to_string()));
        }
        let invoice_ref = state
            .next_ref
            .take()
            .unwrap_or_else(|| format!("CHG{:05}", self.counter.fetch_add(1, Ordering::SeqCst) + 1));
        state.statuses.insert(invoice_ref.clone(), ProviderStatus::New);
        Ok(invoice_ref)
    }

    async fn charge_status(&self, invoice_ref: &str) -> Result<ProviderStatus, ProviderError> {
        let hang = {
            let mut state = self.state.lock().unwrap();
            state.status_checks.push(invoice_ref.to_string());
            if state.failing.contains(invoice_ref) {
                return Err(ProviderError::Unavailable("connection reset".to_string()));
            }
            state.slow.contains(invoice_ref)
        };
        if hang {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        let state = self.state.lock().unwrap();
        state
            .statuses
            .get(invoice_ref)
            .cloned()
            .ok_or_else(|| ProviderError::Unavailable(format!("404 Not Found: {invoice_ref}")))
    }

    fn payment_url(&self, invoice_ref: &str) -> String {
        format!("https://pay.example.test/{invoice_ref}")
    }
}

/// Keeps rendered artifacts in memory so tests can check their lifecycle.
#[derive(Clone, Default)]
pub struct MemoryArtifacts {
    rendered: Arc<Mutex<HashMap<String, String>>>,
    broken: Arc<Mutex<bool>>,
}

impl MemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, invoice_ref: &str) -> bool {
        self.rendered.lock().unwrap().contains_key(invoice_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.lock().unwrap().is_empty()
    }

    pub fn payload(&self, invoice_ref: &str) -> Option<String> {
        self.rendered.lock().unwrap().get(invoice_ref).cloned()
    }

    /// Every render fails while broken.
    pub fn set_broken(&self, broken: bool) {
        *self.broken.lock().unwrap() = broken;
    }
}

impl ChargeArtifacts for MemoryArtifacts {
    async fn render(&self, invoice_ref: &str, payload: &str) -> Result<(), ArtifactError> {
        if *self.broken.lock().unwrap() {
            return Err(ArtifactError::RenderError {
                invoice_ref: invoice_ref.to_string(),
                reason: "disk full".to_string(),
            });
        }
        self.rendered.lock().unwrap().insert(invoice_ref.to_string(), payload.to_string());
        Ok(())
    }

    async fn remove(&self, invoice_ref: &str) -> Result<(), ArtifactError> {
        self.rendered.lock().unwrap().remove(invoice_ref);
        Ok(())
    }
}
