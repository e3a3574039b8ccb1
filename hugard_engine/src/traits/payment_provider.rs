use std::fmt::Display;

use hugard_common::Cents;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Non-success response, transport failure, timeout or malformed payload from the payment processor.
    #[error("The payment provider is unavailable. {0}")]
    Unavailable(String),
}

/// The settlement state of a charge, as reported by the payment provider.
///
/// Providers define an open-ended set of states. The engine only distinguishes [`ProviderStatus::Settled`] from
/// everything else, and unknown states are kept in [`ProviderStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    New,
    Pending,
    Settled,
    Expired,
    Canceled,
    Other(String),
}

impl ProviderStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, ProviderStatus::Settled)
    }
}

impl Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderStatus::New => write!(f, "New"),
            ProviderStatus::Pending => write!(f, "Pending"),
            ProviderStatus::Settled => write!(f, "Settled"),
            ProviderStatus::Expired => write!(f, "Expired"),
            ProviderStatus::Canceled => write!(f, "Canceled"),
            ProviderStatus::Other(s) => write!(f, "Other({s})"),
        }
    }
}

/// The external authority of record for charges. Implementations hold no persistent state; every call is independent
/// and must be bounded by a timeout.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// Registers a charge for `amount`, tagged with the payer reference. Returns the provider's charge identifier.
    async fn create_charge(&self, payer_id: &str, amount: Cents) -> Result<String, ProviderError>;

    /// Queries the current settlement state of the charge.
    async fn charge_status(&self, invoice_ref: &str) -> Result<ProviderStatus, ProviderError>;

    /// The hosted payment page for the charge.
    fn payment_url(&self, invoice_ref: &str) -> String;
}
