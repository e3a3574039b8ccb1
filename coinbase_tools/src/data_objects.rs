use std::{convert::Infallible, fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use hugard_common::{Cents, CURRENCY_CODE};
use serde::{Deserialize, Serialize};

use crate::CoinbaseApiError;

//--------------------------------------     ChargeStatus     ---------------------------------------------------------
/// The state of a charge, as reported in its timeline.
///
/// Coinbase may add new states at any time, so unrecognised values are kept in [`ChargeStatus::Other`] rather than
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChargeStatus {
    New,
    Pending,
    Completed,
    Expired,
    Unresolved,
    Resolved,
    Canceled,
    Other(String),
}

impl ChargeStatus {
    /// Only a completed charge means the funds have cleared.
    pub fn is_settled(&self) -> bool {
        matches!(self, ChargeStatus::Completed)
    }
}

impl Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeStatus::New => write!(f, "NEW"),
            ChargeStatus::Pending => write!(f, "PENDING"),
            ChargeStatus::Completed => write!(f, "COMPLETED"),
            ChargeStatus::Expired => write!(f, "EXPIRED"),
            ChargeStatus::Unresolved => write!(f, "UNRESOLVED"),
            ChargeStatus::Resolved => write!(f, "RESOLVED"),
            ChargeStatus::Canceled => write!(f, "CANCELED"),
            ChargeStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for ChargeStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_uppercase().as_str() {
            "NEW" => Self::New,
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "EXPIRED" => Self::Expired,
            "UNRESOLVED" => Self::Unresolved,
            "RESOLVED" => Self::Resolved,
            "CANCELED" | "CANCELLED" => Self::Canceled,
            _ => Self::Other(s.to_string()),
        };
        Ok(status)
    }
}

impl From<String> for ChargeStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(e) => match e {},
        }
    }
}

impl From<ChargeStatus> for String {
    fn from(value: ChargeStatus) -> Self {
        value.to_string()
    }
}

//--------------------------------------      NewCharge       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalPrice {
    pub amount: String,
    pub currency: String,
}

/// Request body for creating a fixed-price charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCharge {
    pub name: String,
    pub description: String,
    pub pricing_type: String,
    pub local_price: LocalPrice,
}

impl NewCharge {
    pub fn fixed_price(name: String, amount: Cents) -> Self {
        Self {
            name,
            description: "None".to_string(),
            pricing_type: "fixed_price".to_string(),
            local_price: LocalPrice { amount: amount.to_decimal_string(), currency: CURRENCY_CODE.to_string() },
        }
    }
}

//--------------------------------------        Charge        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    pub status: ChargeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub hosted_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

impl Charge {
    /// The current status is the most recent entry in the charge timeline.
    pub fn current_status(&self) -> Result<ChargeStatus, CoinbaseApiError> {
        self.timeline
            .last()
            .map(|entry| entry.status.clone())
            .ok_or_else(|| CoinbaseApiError::MalformedCharge(format!("Charge {} has an empty timeline", self.id)))
    }
}

/// Coinbase wraps every resource in a `data` envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}
