use crate::{
    common::{
        mock_server::{routes, MockResource},
        test_context::TestContext,
    },
    integration_tests::helpers::{
        revoke_failure, single_consent_request, single_consent_request_body,
    },
};
use blink_debit_rust::{apis::consents::ConsentStatus, pollable::RejectionReason, Error};
use reqwest_retry::{policies::ExponentialBackoff, RetryPolicy};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use uuid::Uuid;
use wiremock::ResponseTemplate;

fn fast_retries(max_retries: u32) -> Arc<dyn RetryPolicy + Send + Sync> {
    Arc::new(
        ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(1), Duration::from_millis(10))
            .build_with_max_retries(max_retries),
    )
}

#[tokio::test]
async fn create_quick_payment() {
    let ctx = TestContext::start().await;
    let quick_payment_id = Uuid::new_v4();

    ctx.mock_server
        .mock_create(
            MockResource::QuickPayment,
            single_consent_request_body("single"),
            json!({
                "quick_payment_id": quick_payment_id,
                "redirect_uri": "https://www.example.com/bank"
            }),
        )
        .await;

    let res = ctx
        .client
        .quick_payments
        .create(&single_consent_request())
        .await
        .unwrap();

    assert_eq!(res.quick_payment_id, quick_payment_id);
    assert_eq!(
        res.redirect_uri.as_deref(),
        Some("https://www.example.com/bank")
    );
}

#[tokio::test]
async fn await_successful_quick_payment() {
    let ctx = TestContext::start().await;
    let quick_payment_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get_sequence(
            MockResource::QuickPayment,
            &quick_payment_id,
            vec![
                (
                    routes::ok(routes::quick_payment(
                        &quick_payment_id,
                        "GatewayAwaitingSubmission",
                    )),
                    1,
                ),
                (
                    routes::ok(routes::quick_payment(
                        &quick_payment_id,
                        "AwaitingAuthorisation",
                    )),
                    1,
                ),
                (
                    routes::ok(routes::quick_payment(&quick_payment_id, "Consumed")),
                    1,
                ),
            ],
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::QuickPayment,
            &quick_payment_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    let quick_payment = ctx
        .client
        .await_successful_quick_payment(quick_payment_id, 10)
        .await
        .unwrap();

    assert_eq!(quick_payment.quick_payment_id, quick_payment_id);
    assert_eq!(quick_payment.consent.status, ConsentStatus::Consumed);
}

#[tokio::test]
async fn await_successful_quick_payment_revokes_on_timeout() {
    let ctx = TestContext::start().await;
    let quick_payment_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::QuickPayment,
            &quick_payment_id,
            routes::ok(routes::quick_payment(
                &quick_payment_id,
                "AwaitingAuthorisation",
            )),
            4,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::QuickPayment,
            &quick_payment_id,
            ResponseTemplate::new(204),
            1,
        )
        .await;

    let err = ctx
        .client
        .await_successful_quick_payment(quick_payment_id, 4)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(err.to_string(), "Consent timed out");
}

#[tokio::test]
async fn await_successful_quick_payment_rejected() {
    let ctx = TestContext::start().await;
    let quick_payment_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::QuickPayment,
            &quick_payment_id,
            routes::ok(routes::quick_payment(&quick_payment_id, "Rejected")),
            1,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::QuickPayment,
            &quick_payment_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    let err = ctx
        .client
        .await_successful_quick_payment(quick_payment_id, 10)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Rejected(ref e) if e.reason == RejectionReason::Rejected
    ));
    assert_eq!(
        err.to_string(),
        format!("Quick payment {} has been rejected", quick_payment_id)
    );
}

#[tokio::test]
async fn revoke_after_timeout_is_never_retried() {
    let ctx = TestContext::start().await;
    let quick_payment_id = Uuid::new_v4();

    // A client retrying transient failures, unlike the default test client
    let client = ctx
        .client_builder()
        .with_retry_policy(fast_retries(3))
        .build()
        .unwrap();

    ctx.mock_server
        .mock_get(
            MockResource::QuickPayment,
            &quick_payment_id,
            routes::ok(routes::quick_payment(
                &quick_payment_id,
                "AwaitingAuthorisation",
            )),
            2,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::QuickPayment,
            &quick_payment_id,
            routes::server_error(),
            1,
        )
        .await;

    let err = client
        .await_successful_quick_payment(quick_payment_id, 2)
        .await
        .unwrap_err();

    let (timeout, revoke) = revoke_failure(err);
    assert_eq!(timeout, "Consent timed out");
    assert!(matches!(revoke, Error::ApiError(api_error) if api_error.status == 500));
}

#[tokio::test]
async fn explicit_revoke_is_retried() {
    let ctx = TestContext::start().await;
    let quick_payment_id = Uuid::new_v4();

    let client = ctx
        .client_builder()
        .with_retry_policy(fast_retries(1))
        .build()
        .unwrap();

    ctx.mock_server
        .mock_revoke(
            MockResource::QuickPayment,
            &quick_payment_id,
            routes::server_error(),
            2,
        )
        .await;

    let err = client
        .quick_payments
        .revoke(&quick_payment_id)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ApiError(api_error) if api_error.status == 500));
}
