//! Hugard Engine
//!
//! The Hugard engine is the payment core of a community chat bot. Members request a charge, pay it through an external
//! payment processor, and the engine records and reconciles those payments. The library is provider-agnostic: the
//! processor sits behind the [`PaymentProvider`] trait.
//!
//! The library is divided into two main sections:
//! 1. The ledger ([`mod@db`]). SQLite is the supported backend. You should never need to access the database directly.
//!    Instead, use the public API. The exception is the data types stored in the ledger. These are defined in the
//!    [`db_types`] module and are public.
//! 2. The public API ([`mod@hugard_api`]). This issues charges, runs reconciliation cycles and produces reports.
//!
//! The engine also emits events when a charge is created or a payment settles. A simple actor framework in
//! [`events`] lets you hook into these events, e.g. to notify the payer.
mod db;

pub mod db_types;
pub mod events;
pub mod hugard_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use db::traits::{LedgerError, LedgerStore};
pub use hugard_common::Cents;
pub use hugard_api::{
    charge_issuer_api::{normalize_amount, ChargeIssuerApi},
    charge_objects::{AmountParseError, PayableReference, RequestedAmount},
    errors::{ChargeIssuerError, ReconciliationError, ReportingError},
    reconciliation_api::{ChargeOutcome, CycleReport, ReconciliationApi},
    report_objects::{PaymentHistory, ServerStats},
    reporting_api::ReportingApi,
};
pub use traits::{ArtifactError, ChargeArtifacts, NoArtifacts, PaymentProvider, ProviderError, ProviderStatus};
