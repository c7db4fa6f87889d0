use crate::{
    apis::consents::Consent,
    pollable::{Classification, Classify},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quick payment creates a single consent which, once authorised, is paid automatically.
///
/// The request has the same shape as a
/// [`SingleConsentRequest`](crate::apis::consents::SingleConsentRequest).
pub use crate::apis::consents::SingleConsentRequest as QuickPaymentRequest;

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CreateQuickPaymentResponse {
    pub quick_payment_id: Uuid,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuickPayment {
    pub quick_payment_id: Uuid,
    pub consent: Consent,
}

/// A quick payment has the outcome of its consent.
impl Classify for QuickPayment {
    fn classify(&self) -> Classification {
        self.consent.classify()
    }
}
