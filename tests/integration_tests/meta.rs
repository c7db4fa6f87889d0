use crate::common::test_context::TestContext;
use blink_debit_rust::apis::consents::{Amount, Bank};
use serde_json::json;

#[tokio::test]
async fn get_bank_metadata() {
    let ctx = TestContext::start().await;

    ctx.mock_server
        .mock_bank_metadata(json!([
            {
                "name": "PNZ",
                "payment_limit": { "currency": "NZD", "total": "50000" },
                "features": {
                    "enduring_consent": { "enabled": true, "consent_indefinite": false },
                    "decoupled_flow": { "enabled": true, "available_identifiers": ["phone_number"] }
                },
                "redirect_flow": { "enabled": true, "request_timeout": "PT10M" }
            },
            {
                "name": "Kiwibank",
                "features": {}
            }
        ]))
        .await;

    let banks = ctx.client.meta.get_bank_metadata().await.unwrap();

    assert_eq!(banks.len(), 2);
    assert_eq!(banks[0].name, Bank::Pnz);
    assert_eq!(banks[0].payment_limit, Some(Amount::nzd("50000")));
    assert_eq!(
        banks[0].features["enduring_consent"]["enabled"],
        json!(true)
    );
    assert_eq!(
        banks[0]
            .redirect_flow
            .as_ref()
            .and_then(|r| r.request_timeout.as_deref()),
        Some("PT10M")
    );
    assert_eq!(banks[1].name, Bank::Other);
    assert!(banks[1].redirect_flow.is_none());
}
