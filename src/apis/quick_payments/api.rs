use crate::{
    apis::{
        quick_payments::{CreateQuickPaymentResponse, QuickPayment, QuickPaymentRequest},
        BlinkDebitClientInner,
    },
    Error,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize)]
struct SingleQuickPayment<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    body: &'a QuickPaymentRequest,
}

/// Blink Debit quick payments APIs client.
#[derive(Clone, Debug)]
pub struct QuickPaymentsApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl QuickPaymentsApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Creates a quick payment.
    #[tracing::instrument(
        name = "Create Quick Payment",
        skip(self, req),
        fields(total = %req.amount.total, currency = %req.amount.currency)
    )]
    pub async fn create(
        &self,
        req: &QuickPaymentRequest,
    ) -> Result<CreateQuickPaymentResponse, Error> {
        self.inner
            .create(
                "quick-payments",
                &SingleQuickPayment {
                    kind: "single",
                    body: req,
                },
            )
            .await
    }

    /// Gets the details of an existing quick payment.
    ///
    /// If there's no quick payment with the given id, [`Error::NotFound`](crate::Error::NotFound) is returned.
    #[tracing::instrument(name = "Get Quick Payment by ID", skip(self))]
    pub async fn get_by_id(&self, id: &Uuid) -> Result<QuickPayment, Error> {
        self.inner.get(&format!("quick-payments/{}", id)).await
    }

    /// Revokes an existing quick payment, unless it was already paid.
    #[tracing::instrument(name = "Revoke Quick Payment", skip(self))]
    pub async fn revoke(&self, id: &Uuid) -> Result<(), Error> {
        self.inner.delete(&format!("quick-payments/{}", id)).await
    }

    pub(crate) async fn revoke_once(&self, id: &Uuid) -> Result<(), Error> {
        self.inner
            .delete_once(&format!("quick-payments/{}", id))
            .await
    }
}
