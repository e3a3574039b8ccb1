//! # Coinbase Commerce tools
//!
//! A small, stateless REST client for the two Coinbase Commerce operations the payment bot needs: creating a
//! fixed-price charge and reading back its timeline.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::CoinbaseApi;
pub use config::CoinbaseConfig;
pub use data_objects::{Charge, ChargeStatus, LocalPrice, NewCharge, TimelineEntry};
pub use error::CoinbaseApiError;
