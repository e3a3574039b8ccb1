//! Seams to the collaborators the engine depends on but does not implement: the payment provider and the store for
//! disposable scannable-code artifacts.
mod charge_artifacts;
mod payment_provider;

pub use charge_artifacts::{ArtifactError, ChargeArtifacts, NoArtifacts};
pub use payment_provider::{PaymentProvider, ProviderError, ProviderStatus};
