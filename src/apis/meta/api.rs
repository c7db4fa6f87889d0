use crate::{
    apis::{meta::BankMetadata, BlinkDebitClientInner},
    Error,
};
use std::sync::Arc;

/// Blink Debit metadata APIs client.
#[derive(Clone, Debug)]
pub struct MetaApi {
    inner: Arc<BlinkDebitClientInner>,
}

impl MetaApi {
    pub(crate) fn new(inner: Arc<BlinkDebitClientInner>) -> Self {
        Self { inner }
    }

    /// Lists the banks supported by Blink and the features each of them offers.
    #[tracing::instrument(name = "Get Bank Metadata", skip(self))]
    pub async fn get_bank_metadata(&self) -> Result<Vec<BankMetadata>, Error> {
        self.inner.get("meta").await
    }
}
