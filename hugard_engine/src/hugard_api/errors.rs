use hugard_common::Cents;
use thiserror::Error;

use crate::{db::traits::LedgerError, traits::ProviderError};

#[derive(Debug, Clone, Error)]
pub enum ChargeIssuerError {
    #[error("Invalid payment amount. {0}")]
    InvalidAmount(String),
    #[error("The minimum payment is {0}")]
    BelowMinimum(Cents),
    #[error("The payment provider could not create the charge. {0}")]
    ProviderUnavailable(String),
    #[error("The provider issued invoice {0}, but it has already been recorded")]
    DuplicateInvoice(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ChargeIssuerError {
    /// Validation errors are the requester's to fix. Everything else is a processing failure on our side.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::InvalidAmount(_) | Self::BelowMinimum(_))
    }
}

impl From<ProviderError> for ChargeIssuerError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Unavailable(s) => Self::ProviderUnavailable(s),
        }
    }
}

impl From<LedgerError> for ChargeIssuerError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::DuplicateInvoice(invoice_ref) => Self::DuplicateInvoice(invoice_ref),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Could not read the pending charges. {0}")]
    DatabaseError(String),
}

impl From<LedgerError> for ReconciliationError {
    fn from(e: LedgerError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ReportingError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerError> for ReportingError {
    fn from(e: LedgerError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
