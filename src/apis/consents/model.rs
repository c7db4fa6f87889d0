use crate::{
    apis::{payments::Payment, refunds::Refund},
    pollable::{Classification, Classify, RejectionReason},
};
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Currency {
    #[serde(rename = "NZD")]
    Nzd,
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Nzd => write!(f, "NZD"),
        }
    }
}

/// An amount of money, as a decimal string with up to two decimal places (e.g. `"25.50"`).
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct Amount {
    pub currency: Currency,
    pub total: String,
}

impl Amount {
    pub fn nzd(total: impl Into<String>) -> Self {
        Self {
            currency: Currency::Nzd,
            total: total.into(),
        }
    }
}

/// Particulars, code and reference shown on the payer's and payee's bank statements.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
#[builder(setter(into))]
pub struct Pcr {
    pub particulars: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub reference: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Bank {
    #[serde(rename = "ASB")]
    Asb,
    #[serde(rename = "ANZ")]
    Anz,
    #[serde(rename = "BNZ")]
    Bnz,
    Westpac,
    #[serde(rename = "PNZ")]
    Pnz,
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierType {
    PhoneNumber,
    ConsentId,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct AuthFlow {
    pub detail: AuthFlowDetail,
}

impl From<AuthFlowDetail> for AuthFlow {
    fn from(detail: AuthFlowDetail) -> Self {
        Self { detail }
    }
}

/// How the customer authorises the consent.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthFlowDetail {
    /// The customer is redirected to their bank's website or app.
    Redirect {
        bank: Bank,
        redirect_uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        redirect_to_app: Option<bool>,
    },
    /// The customer approves the consent in their bank's app, without any redirection.
    Decoupled {
        bank: Bank,
        identifier_type: IdentifierType,
        identifier_value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        callback_url: Option<String>,
    },
    /// The customer picks their bank in the Blink hosted gateway.
    Gateway {
        redirect_uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        flow_hint: Option<FlowHint>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowHint {
    Redirect {
        bank: Bank,
    },
    Decoupled {
        bank: Bank,
        identifier_type: IdentifierType,
        identifier_value: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
pub struct SingleConsentRequest {
    pub flow: AuthFlow,
    pub pcr: Pcr,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub hashed_customer_identifier: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Fortnightly,
    Monthly,
    Yearly,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Builder)]
pub struct EnduringConsentRequest {
    pub flow: AuthFlow,
    pub from_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub expiry_timestamp: Option<DateTime<Utc>>,
    pub period: Period,
    pub maximum_amount_period: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub maximum_amount_payment: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub hashed_customer_identifier: Option<String>,
}

/// The terms of a consent, as returned by the server.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsentDetail {
    Single(SingleConsentRequest),
    Enduring(EnduringConsentRequest),
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CreateConsentResponse {
    pub consent_id: Uuid,
    /// Where to send the customer to authorise the consent. Absent for decoupled flows.
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConsentStatus {
    GatewayAwaitingSubmission,
    GatewayTimeout,
    AwaitingAuthorisation,
    Authorised,
    Consumed,
    Rejected,
    Revoked,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl Classify for ConsentStatus {
    fn classify(&self) -> Classification {
        match self {
            ConsentStatus::Authorised | ConsentStatus::Consumed => Classification::Success,
            ConsentStatus::Rejected => Classification::Rejected(RejectionReason::Rejected),
            ConsentStatus::Revoked => Classification::Rejected(RejectionReason::Revoked),
            ConsentStatus::GatewayTimeout => {
                Classification::Rejected(RejectionReason::GatewayTimeout)
            }
            ConsentStatus::GatewayAwaitingSubmission
            | ConsentStatus::AwaitingAuthorisation
            | ConsentStatus::Unknown => Classification::Retry,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Consent {
    pub consent_id: Uuid,
    pub status: ConsentStatus,
    pub creation_timestamp: DateTime<Utc>,
    pub status_updated_timestamp: DateTime<Utc>,
    pub detail: ConsentDetail,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub refunds: Vec<Refund>,
}

impl Classify for Consent {
    fn classify(&self) -> Classification {
        self.status.classify()
    }
}
