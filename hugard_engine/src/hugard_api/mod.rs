//! # Hugard engine public API
//!
//! The API is modular, so clients pick the functionality they need:
//!
//! * [`charge_issuer_api`] validates payment requests, creates provider charges and records them in the ledger.
//! * [`reconciliation_api`] polls the provider for every pending charge and applies settlements exactly once.
//! * [`reporting_api`] aggregates settled charges into histories and leaderboards.
//!
//! Every API is created by supplying a ledger backend (and, where needed, a payment provider and an artifact store):
//!
//! ```rust,ignore
//! use hugard_engine::{ReportingApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/payments.db", 5).await?;
//! let api = ReportingApi::new(db);
//! let stats = api.server_stats().await?;
//! ```
pub mod charge_issuer_api;
pub mod charge_objects;
pub mod errors;
pub mod reconciliation_api;
pub mod report_objects;
pub mod reporting_api;
