//! Data types stored in, and read from, the ledger.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use hugard_common::Cents;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------     ChargeStatus      ---------------------------------------------------------
/// Local settlement state of a charge.
///
/// Every non-terminal provider state collapses into `New`. The only permitted transition is `New` to `Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ChargeStatus {
    /// The charge has been created with the provider, but the provider has not reported it as complete.
    New,
    /// The provider has reported the charge as complete. This state is final.
    Settled,
}

impl Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeStatus::New => write!(f, "NEW"),
            ChargeStatus::Settled => write!(f, "SETTLED"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid charge status: {0}")]
pub struct ConversionError(String);

impl FromStr for ChargeStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "SETTLED" => Ok(Self::Settled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------     ChargeRecord      ---------------------------------------------------------
/// One row of the `payments` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub id: i64,
    /// Opaque identifier of the member that requested the charge
    pub payer_id: String,
    pub amount: Cents,
    /// The charge identifier assigned by the payment provider
    pub invoice_ref: String,
    pub status: ChargeStatus,
    pub created_at: DateTime<Utc>,
}

impl ChargeRecord {
    pub fn is_settled(&self) -> bool {
        self.status == ChargeStatus::Settled
    }
}

//--------------------------------------   NewChargeRecord     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChargeRecord {
    pub payer_id: String,
    pub amount: Cents,
    pub invoice_ref: String,
}

impl NewChargeRecord {
    pub fn new<S: Into<String>, R: Into<String>>(payer_id: S, amount: Cents, invoice_ref: R) -> Self {
        Self { payer_id: payer_id.into(), amount, invoice_ref: invoice_ref.into() }
    }
}

//--------------------------------------    SettledPayment     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SettledPayment {
    pub amount: Cents,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      PayerTotal       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PayerTotal {
    pub payer_id: String,
    pub total: Cents,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_round_trip_names() {
        assert_eq!(ChargeStatus::Settled.to_string(), "SETTLED");
        assert_eq!("NEW".parse::<ChargeStatus>().unwrap(), ChargeStatus::New);
        assert!("COMPLETE".parse::<ChargeStatus>().is_err());
        assert_eq!(serde_json::to_string(&ChargeStatus::Settled).unwrap(), "\"SETTLED\"");
    }
}
