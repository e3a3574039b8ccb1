//! # Ledger management and control.
//!
//! This module provides the interface contract for ledger *backends*.
//!
//! The ledger is the single source of truth for the state of every charge. Other components never touch the storage
//! directly. They request new records through [`LedgerStore::create`], and the reconciliation loop requests the
//! settlement transition through [`LedgerStore::mark_settled`]. Everything else is read-only.
mod ledger_store;

pub use ledger_store::{LedgerError, LedgerStore};
