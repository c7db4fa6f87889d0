use crate::apis::consents::{Amount, Bank};
use serde::{Deserialize, Serialize};

/// Capabilities of a bank supported by Blink.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankMetadata {
    pub name: Bank,
    #[serde(default)]
    pub payment_limit: Option<Amount>,
    /// Per-flow feature flags, as reported by the server.
    #[serde(default)]
    pub features: serde_json::Value,
    #[serde(default)]
    pub redirect_flow: Option<RedirectFlowMetadata>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct RedirectFlowMetadata {
    pub enabled: bool,
    /// ISO 8601 duration, e.g. `PT10M`.
    #[serde(default)]
    pub request_timeout: Option<String>,
}
