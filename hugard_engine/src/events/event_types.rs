use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db_types::ChargeRecord;

/// Emitted exactly once per charge, by whichever reconciliation pass performed the `NEW` to `SETTLED` transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettledEvent {
    pub record: ChargeRecord,
    pub settled_at: DateTime<Utc>,
}

impl PaymentSettledEvent {
    pub fn new(record: ChargeRecord) -> Self {
        Self { record, settled_at: Utc::now() }
    }
}
