//! Coinbase Commerce as the engine's payment provider.
use coinbase_tools::{ChargeStatus, CoinbaseApi, CoinbaseApiError, CoinbaseConfig};
use hugard_common::Cents;
use hugard_engine::{PaymentProvider, ProviderError, ProviderStatus};
use log::*;

/// Adapts [`CoinbaseApi`] to the [`PaymentProvider`] seam.
#[derive(Clone)]
pub struct CoinbaseProvider {
    api: CoinbaseApi,
}

impl CoinbaseProvider {
    pub fn new(config: CoinbaseConfig) -> Result<Self, CoinbaseApiError> {
        let api = CoinbaseApi::new(config)?;
        Ok(Self { api })
    }
}

/// Coinbase only counts `COMPLETED` as settled. Every other timeline state keeps the charge pending.
pub fn provider_status(status: ChargeStatus) -> ProviderStatus {
    match status {
        ChargeStatus::New => ProviderStatus::New,
        ChargeStatus::Pending => ProviderStatus::Pending,
        ChargeStatus::Completed => ProviderStatus::Settled,
        ChargeStatus::Expired => ProviderStatus::Expired,
        ChargeStatus::Canceled => ProviderStatus::Canceled,
        other => ProviderStatus::Other(other.to_string()),
    }
}

fn unavailable(e: CoinbaseApiError) -> ProviderError {
    ProviderError::Unavailable(e.to_string())
}

impl PaymentProvider for CoinbaseProvider {
    async fn create_charge(&self, payer_id: &str, amount: Cents) -> Result<String, ProviderError> {
        let charge = self.api.create_charge(format!("Payment From {payer_id}"), amount).await.map_err(unavailable)?;
        Ok(charge.id)
    }

    async fn charge_status(&self, invoice_ref: &str) -> Result<ProviderStatus, ProviderError> {
        let status = self.api.charge_status(invoice_ref).await.map_err(|e| {
            debug!("Coinbase status check for {invoice_ref} failed. {e}");
            unavailable(e)
        })?;
        Ok(provider_status(status))
    }

    fn payment_url(&self, invoice_ref: &str) -> String {
        self.api.payment_url(invoice_ref)
    }
}
