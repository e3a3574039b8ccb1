//! # Hugard server
//! This crate hosts the server side of the Hugard payment bot. It is responsible for:
//! * Accepting slash commands relayed by the chat platform gateway, and turning payment requests into charges.
//! * Running the reconciliation worker that polls the payment processor and settles paid charges.
//! * Notifying the community owner when a payment settles.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/commands/{ping,about,pay,history,metrics}`: The chat commands. Requests must carry a valid HMAC signature.
//! * `/qrcodes/{invoice_ref}`: The scannable payment code for a pending charge.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod member_directory;
pub mod messages;
pub mod middleware;
pub mod notifier;
pub mod qr_codes;
pub mod reconciliation_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
