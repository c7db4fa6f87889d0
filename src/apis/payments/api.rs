use crate::{
    apis::{
        payments::{CreatePaymentResponse, Payment, PaymentRequest},
        BlinkDebitClientInner,
    },
    Error,
};
use std::sync::Arc;
use uuid::Uuid;

/// Blink Debit payments APIs client.
#[derive(Clone, Debug)]
pub struct PaymentsApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl PaymentsApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Executes a payment against an authorised consent.
    #[tracing::instrument(
        name = "Create Payment",
        skip(self, req),
        fields(consent_id = %req.consent_id)
    )]
    pub async fn create(&self, req: &PaymentRequest) -> Result<CreatePaymentResponse, Error> {
        self.inner.create("payments", req).await
    }

    /// Gets the details of an existing payment.
    ///
    /// If there's no payment with the given id, [`Error::NotFound`](crate::Error::NotFound) is returned.
    #[tracing::instrument(name = "Get Payment by ID", skip(self))]
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Payment, Error> {
        self.inner.get(&format!("payments/{}", id)).await
    }
}
