use crate::{
    apis::{
        consents::{Consent, CreateConsentResponse, EnduringConsentRequest, SingleConsentRequest},
        BlinkDebitClientInner,
    },
    Error,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Request body tagged with the consent type, as expected by the consent endpoints.
#[derive(Serialize)]
struct Typed<'a, T> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

/// Blink Debit single consents APIs client.
#[derive(Clone, Debug)]
pub struct SingleConsentsApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl SingleConsentsApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Creates a consent for a single payment.
    ///
    /// The customer then authorises it at their bank, following the returned `redirect_uri`
    /// or (for decoupled flows) in their banking app.
    #[tracing::instrument(
        name = "Create Single Consent",
        skip(self, req),
        fields(total = %req.amount.total, currency = %req.amount.currency)
    )]
    pub async fn create(&self, req: &SingleConsentRequest) -> Result<CreateConsentResponse, Error> {
        self.inner
            .create(
                "single-consents",
                &Typed {
                    kind: "single",
                    body: req,
                },
            )
            .await
    }

    /// Gets the details of an existing single consent.
    ///
    /// If there's no consent with the given id, [`Error::NotFound`](crate::Error::NotFound) is returned.
    #[tracing::instrument(name = "Get Single Consent by ID", skip(self))]
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Consent, Error> {
        self.inner.get(&format!("single-consents/{}", id)).await
    }

    /// Revokes an existing single consent.
    #[tracing::instrument(name = "Revoke Single Consent", skip(self))]
    pub async fn revoke(&self, id: &Uuid) -> Result<(), Error> {
        self.inner.delete(&format!("single-consents/{}", id)).await
    }

    /// Same as [`revoke`](Self::revoke), without retries.
    pub(crate) async fn revoke_once(&self, id: &Uuid) -> Result<(), Error> {
        self.inner
            .delete_once(&format!("single-consents/{}", id))
            .await
    }
}

/// Blink Debit enduring consents APIs client.
#[derive(Clone, Debug)]
pub struct EnduringConsentsApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl EnduringConsentsApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Creates a consent allowing recurring payments up to the agreed limits.
    #[tracing::instrument(
        name = "Create Enduring Consent",
        skip(self, req),
        fields(period = ?req.period, maximum_amount_period = %req.maximum_amount_period.total)
    )]
    pub async fn create(
        &self,
        req: &EnduringConsentRequest,
    ) -> Result<CreateConsentResponse, Error> {
        self.inner
            .create(
                "enduring-consents",
                &Typed {
                    kind: "enduring",
                    body: req,
                },
            )
            .await
    }

    /// Gets the details of an existing enduring consent.
    ///
    /// If there's no consent with the given id, [`Error::NotFound`](crate::Error::NotFound) is returned.
    #[tracing::instrument(name = "Get Enduring Consent by ID", skip(self))]
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Consent, Error> {
        self.inner.get(&format!("enduring-consents/{}", id)).await
    }

    /// Revokes an existing enduring consent. No further payments can be made against it.
    #[tracing::instrument(name = "Revoke Enduring Consent", skip(self))]
    pub async fn revoke(&self, id: &Uuid) -> Result<(), Error> {
        self.inner
            .delete(&format!("enduring-consents/{}", id))
            .await
    }

    pub(crate) async fn revoke_once(&self, id: &Uuid) -> Result<(), Error> {
        self.inner
            .delete_once(&format!("enduring-consents/{}", id))
            .await
    }
}
