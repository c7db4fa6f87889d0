
use reqwest::Url;
use serde_json::json;
use uuid::Uuid;
use wiremock::{
    matchers::{body_json, header, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Resources which can be fetched (and possibly revoked) on the mock server.
#[derive(Clone, Copy, Debug)]
pub enum MockResource {
    SingleConsent,
    EnduringConsent,
    QuickPayment,
    Payment,
    Refund,
}

impl MockResource {
    pub fn path(&self, id: &Uuid) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    pub fn collection_path(&self) -> &'static str {
        match self {
            MockResource::SingleConsent => "/payments/v1/single-consents",
            MockResource::EnduringConsent => "/payments/v1/enduring-consents",
            MockResource::QuickPayment => "/payments/v1/quick-payments",
            MockResource::Payment => "/payments/v1/payments",
            MockResource::Refund => "/payments/v1/refunds",
        }
    }
}

/// Blink Debit APIs mock, backed by a wiremock server.
///
/// The token endpoint only accepts the credentials given to [`BlinkMockServer::start`],
/// and every other route requires the access token it hands out.
pub struct BlinkMockServer {
    server: MockServer,
    access_token: String,
}

impl BlinkMockServer {
    pub async fn start(client_id: &str, client_secret: &str) -> Self {
        let server = MockServer::start().await;
        let access_token = Uuid::new_v4().to_string();

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_json(json!({
                "grant_type": "client_credentials",
                "client_id": client_id,
                "client_secret": client_secret
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "create:payment view:payment"
            })))
            .named("Token endpoint")
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "Client authentication failed"
            })))
            .named("Token endpoint with invalid credentials")
            .mount(&server)
            .await;

        Self {
            server,
            access_token,
        }
    }

    pub fn url(&self) -> Url {
        Url::parse(&self.server.uri()).unwrap()
    }

    /// Builds a mock which only matches authenticated requests.
    fn authenticated(&self, http_method: &str, route: String) -> wiremock::MockBuilder {
        Mock::given(method(http_method))
            .and(path(route))
            .and(header(
                "Authorization",
                format!("Bearer {}", self.access_token).as_str(),
            ))
    }

    /// Checks how many times the token endpoint was called so far.
    pub async fn assert_token_requests(&self, token_requests: usize) {
        let received = self
            .server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == "/oauth2/token")
            .count();
        assert_eq!(received, token_requests);
    }

    /// Accepts the creation of a resource with the given body, which must carry an idempotency key.
    pub async fn mock_create(
        &self,
        resource: MockResource,
        expected_body: serde_json::Value,
        response: serde_json::Value,
    ) {
        self.authenticated("POST", resource.collection_path().to_string())
            .and(header_exists("idempotency-key"))
            .and(header_exists("request-id"))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(201).set_body_json(response))
            .expect(1)
            .named("Create resource")
            .mount(&self.server)
            .await;
    }

    /// Answers GETs of a resource with each of the `responses` in turn, each one
    /// exactly the given number of times.
    pub async fn mock_get_sequence(
        &self,
        resource: MockResource,
        id: &Uuid,
        responses: Vec<(ResponseTemplate, u64)>,
    ) {
        for (response, times) in responses {
            self.authenticated("GET", resource.path(id))
                .respond_with(response)
                .up_to_n_times(times)
                .expect(times)
                .named("Get resource")
                .mount(&self.server)
                .await;
        }
    }

    /// Answers every GET of a resource with the same response, expecting exactly `times` of them.
    pub async fn mock_get(
        &self,
        resource: MockResource,
        id: &Uuid,
        response: ResponseTemplate,
        times: u64,
    ) {
        self.mock_get_sequence(resource, id, vec![(response, times)])
            .await;
    }

    /// Answers DELETEs of a resource, expecting exactly `times` of them.
    pub async fn mock_revoke(
        &self,
        resource: MockResource,
        id: &Uuid,
        response: ResponseTemplate,
        times: u64,
    ) {
        self.authenticated("DELETE", resource.path(id))
            .respond_with(response)
            .expect(times)
            .named("Revoke resource")
            .mount(&self.server)
            .await;
    }

    pub async fn mock_bank_metadata(&self, response: serde_json::Value) {
        self.authenticated("GET", "/payments/v1/meta".to_string())
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .named("Bank metadata")
            .mount(&self.server)
            .await;
    }
}
