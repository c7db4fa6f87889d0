use crate::apis::consents::{Amount, Pcr};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefundRequest {
    /// Only retrieves the payer's account number, no money is moved.
    AccountNumber { payment_id: Uuid },
    /// Refunds the whole payment through a new consent.
    FullRefund {
        payment_id: Uuid,
        consent_redirect: String,
        pcr: Pcr,
    },
    /// Refunds part of the payment through a new consent.
    PartialRefund {
        payment_id: Uuid,
        consent_redirect: String,
        pcr: Pcr,
        amount: Amount,
    },
}

impl RefundRequest {
    pub fn payment_id(&self) -> &Uuid {
        match self {
            RefundRequest::AccountNumber { payment_id }
            | RefundRequest::FullRefund { payment_id, .. }
            | RefundRequest::PartialRefund { payment_id, .. } => payment_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CreateRefundResponse {
    pub refund_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum RefundStatus {
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Refund {
    pub refund_id: Uuid,
    pub status: RefundStatus,
    pub creation_timestamp: DateTime<Utc>,
    pub status_updated_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub account_number: Option<String>,
    pub detail: RefundRequest,
}
