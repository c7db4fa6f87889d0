use crate::{
    apis::{
        consents::{Amount, Pcr},
        refunds::Refund,
    },
    pollable::{Classification, Classify, RejectionReason},
};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to execute a payment against an authorised consent.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
pub struct PaymentRequest {
    pub consent_id: Uuid,
    /// Amount and PCR of the payment, required for enduring consents only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub enduring_payment: Option<EnduringPaymentRequest>,
    /// Required for Westpac payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub account_reference_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct EnduringPaymentRequest {
    pub amount: Amount,
    pub pcr: Pcr,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CreatePaymentResponse {
    pub payment_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Single,
    Enduring,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum PaymentStatus {
    Pending,
    AcceptedSettlementInProcess,
    AcceptedSettlementCompleted,
    Rejected,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl Classify for PaymentStatus {
    fn classify(&self) -> Classification {
        match self {
            PaymentStatus::AcceptedSettlementCompleted => Classification::Success,
            PaymentStatus::Rejected => Classification::Rejected(RejectionReason::Rejected),
            PaymentStatus::Pending
            | PaymentStatus::AcceptedSettlementInProcess
            | PaymentStatus::Unknown => Classification::Retry,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Payment {
    pub payment_id: Uuid,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
    pub status: PaymentStatus,
    pub creation_timestamp: DateTime<Utc>,
    pub status_updated_timestamp: DateTime<Utc>,
    pub detail: PaymentRequest,
    #[serde(default)]
    pub refunds: Vec<Refund>,
}

impl Classify for Payment {
    fn classify(&self) -> Classification {
        self.status.classify()
    }
}
