use crate::{
    common::{
        mock_server::{routes, MockResource},
        test_context::TestContext,
    },
    integration_tests::helpers::{
        enduring_consent_request, enduring_consent_request_body, revoke_failure,
        single_consent_request, single_consent_request_body,
    },
};
use blink_debit_rust::{
    apis::consents::{ConsentDetail, ConsentStatus},
    error::{RejectedError, TimeoutError},
    pollable::{RejectionReason, ResourceKind},
    Error,
};
use std::time::Duration;
use test_case::test_case;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn create_single_consent() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_create(
            MockResource::SingleConsent,
            single_consent_request_body("single"),
            routes::create_consent_response(&consent_id),
        )
        .await;

    let res = ctx
        .client
        .single_consents
        .create(&single_consent_request())
        .await
        .unwrap();

    assert_eq!(res.consent_id, consent_id);
    assert_eq!(
        res.redirect_uri.as_deref(),
        Some("https://www.example.com/return")
    );
}

#[tokio::test]
async fn create_enduring_consent() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_create(
            MockResource::EnduringConsent,
            enduring_consent_request_body(),
            routes::create_consent_response(&consent_id),
        )
        .await;

    let res = ctx
        .client
        .enduring_consents
        .create(&enduring_consent_request())
        .await
        .unwrap();

    assert_eq!(res.consent_id, consent_id);
}

#[tokio::test]
async fn get_single_consent() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::ok(routes::single_consent(&consent_id, "AwaitingAuthorisation")),
            1,
        )
        .await;

    let consent = ctx
        .client
        .single_consents
        .get_by_id(&consent_id)
        .await
        .unwrap();

    assert_eq!(consent.consent_id, consent_id);
    assert_eq!(consent.status, ConsentStatus::AwaitingAuthorisation);
    assert!(matches!(consent.detail, ConsentDetail::Single(_)));
}

#[tokio::test]
async fn get_non_existent_consent_is_not_found() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();
    let path = MockResource::EnduringConsent.path(&consent_id);

    ctx.mock_server
        .mock_get(
            MockResource::EnduringConsent,
            &consent_id,
            routes::not_found(&path),
            1,
        )
        .await;

    let err = ctx
        .client
        .enduring_consents
        .get_by_id(&consent_id)
        .await
        .unwrap_err();

    match err {
        Error::NotFound(api_error) => {
            assert_eq!(api_error.status, 404);
            assert_eq!(api_error.path.as_deref(), Some(path.as_str()));
        }
        e => panic!("Unexpected error: {}", e),
    }
}

#[tokio::test]
async fn revoke_single_consent() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            1,
        )
        .await;

    ctx.client
        .single_consents
        .revoke(&consent_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn await_authorised_single_consent_after_a_few_polls() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get_sequence(
            MockResource::SingleConsent,
            &consent_id,
            vec![
                (
                    routes::ok(routes::single_consent(&consent_id, "AwaitingAuthorisation")),
                    2,
                ),
                (
                    routes::ok(routes::single_consent(&consent_id, "Authorised")),
                    1,
                ),
            ],
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    let consent = ctx
        .client
        .await_authorised_single_consent(consent_id, 10)
        .await
        .unwrap();

    assert_eq!(consent.status, ConsentStatus::Authorised);
}

#[tokio::test]
async fn await_authorised_single_consent_revokes_on_timeout() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::ok(routes::single_consent(&consent_id, "AwaitingAuthorisation")),
            5,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            1,
        )
        .await;

    let err = ctx
        .client
        .await_authorised_single_consent(consent_id, 5)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Consent timed out");
    assert!(matches!(
        err,
        Error::Timeout(TimeoutError {
            kind: ResourceKind::SingleConsent,
            id
        }) if id == consent_id
    ));
}

#[tokio::test]
async fn await_successful_single_consent_does_not_revoke_on_timeout() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::ok(routes::single_consent(&consent_id, "GatewayAwaitingSubmission")),
            3,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    let err = ctx
        .client
        .await_successful_single_consent(consent_id, 3)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert_eq!(err.to_string(), "Consent timed out");
}

#[test_case("Rejected", RejectionReason::Rejected ; "rejected")]
#[test_case("Revoked", RejectionReason::Revoked ; "revoked")]
#[test_case("GatewayTimeout", RejectionReason::GatewayTimeout ; "gateway timeout")]
#[tokio::test]
async fn await_authorised_single_consent_fails_immediately_when_rejected(
    status: &str,
    expected_reason: RejectionReason,
) {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::ok(routes::single_consent(&consent_id, status)),
            1,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    let err = ctx
        .client
        .await_authorised_single_consent(consent_id, 10)
        .await
        .unwrap_err();

    assert_ne!(err.to_string(), "Consent timed out");
    assert_eq!(
        match err {
            Error::Rejected(e) => e,
            e => panic!("Unexpected error: {}", e),
        },
        RejectedError {
            kind: ResourceKind::SingleConsent,
            id: consent_id,
            reason: expected_reason,
        }
    );
}

#[tokio::test]
async fn await_authorised_single_consent_propagates_not_found() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::not_found(&MockResource::SingleConsent.path(&consent_id)),
            1,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    let err = ctx
        .client
        .await_authorised_single_consent(consent_id, 10)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn await_authorised_single_consent_reports_failed_revoke() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::ok(routes::single_consent(&consent_id, "AwaitingAuthorisation")),
            2,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            routes::server_error(),
            1,
        )
        .await;

    let err = ctx
        .client
        .await_authorised_single_consent(consent_id, 2)
        .await
        .unwrap_err();

    let (timeout, revoke) = revoke_failure(err);
    assert_eq!(timeout, "Consent timed out");
    assert!(matches!(revoke, Error::ApiError(api_error) if api_error.status == 500));
}

#[tokio::test]
async fn await_authorised_enduring_consent() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::EnduringConsent,
            &consent_id,
            routes::ok(routes::enduring_consent(&consent_id, "Authorised")),
            1,
        )
        .await;

    let consent = ctx
        .client
        .await_authorised_enduring_consent(consent_id, 10)
        .await
        .unwrap();

    assert_eq!(consent.status, ConsentStatus::Authorised);
    assert!(matches!(consent.detail, ConsentDetail::Enduring(_)));
}

#[tokio::test]
async fn await_authorised_enduring_consent_revokes_on_timeout() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::EnduringConsent,
            &consent_id,
            routes::ok(routes::enduring_consent(&consent_id, "AwaitingAuthorisation")),
            3,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::EnduringConsent,
            &consent_id,
            ResponseTemplate::new(204),
            1,
        )
        .await;

    let err = ctx
        .client
        .await_authorised_enduring_consent(consent_id, 3)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Consent timed out");
}

#[tokio::test]
async fn await_successful_enduring_consent_consumed() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::EnduringConsent,
            &consent_id,
            routes::ok(routes::enduring_consent(&consent_id, "Consumed")),
            1,
        )
        .await;

    let consent = ctx
        .client
        .await_successful_enduring_consent(consent_id, 10)
        .await
        .unwrap();

    assert_eq!(consent.status, ConsentStatus::Consumed);
}

#[tokio::test]
async fn cancelled_wait_does_not_revoke() {
    let ctx = TestContext::start().await;
    let consent_id = Uuid::new_v4();

    ctx.mock_server
        .mock_get(
            MockResource::SingleConsent,
            &consent_id,
            routes::ok(routes::single_consent(&consent_id, "AwaitingAuthorisation")),
            1,
        )
        .await;
    ctx.mock_server
        .mock_revoke(
            MockResource::SingleConsent,
            &consent_id,
            ResponseTemplate::new(204),
            0,
        )
        .await;

    // Poll slowly enough for the cancellation to land during the first wait
    let cancellation = CancellationToken::new();
    let options = ctx
        .client
        .poll_options(60)
        .with_interval(Duration::from_secs(10))
        .with_cancellation(cancellation.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancellation.cancel();
    });

    let err = ctx
        .client
        .await_authorised_single_consent_with_options(consent_id, options)
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, Error::Cancelled));
}
