use crate::{
    apis::{
        refunds::{CreateRefundResponse, Refund, RefundRequest},
        BlinkDebitClientInner,
    },
    Error,
};
use std::sync::Arc;
use uuid::Uuid;

/// Blink Debit refunds APIs client.
#[derive(Clone, Debug)]
pub struct RefundsApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl RefundsApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Creates a refund for an existing payment.
    #[tracing::instrument(
        name = "Create Refund",
        skip(self, req),
        fields(payment_id = %req.payment_id())
    )]
    pub async fn create(&self, req: &RefundRequest) -> Result<CreateRefundResponse, Error> {
        self.inner.create("refunds", req).await
    }

    /// Gets the details of an existing refund.
    ///
    /// If there's no refund with the given id, [`Error::NotFound`](crate::Error::NotFound) is returned.
    #[tracing::instrument(name = "Get Refund by ID", skip(self))]
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Refund, Error> {
        self.inner.get(&format!("refunds/{}", id)).await
    }
}
