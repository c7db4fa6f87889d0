use crate::common::{CORRELATION_ID_HEADER, REQUEST_ID_HEADER};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, USER_AGENT},
    Request, Response,
};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;
use uuid::Uuid;

/// Middleware adding the headers expected by the Blink Debit APIs to all outgoing requests:
///
/// - `User-Agent`, always;
/// - `request-id`, a fresh UUID unless the request already carries one;
/// - `x-correlation-id`, if one was configured and the request does not carry one.
pub struct InjectHeadersMiddleware {
    user_agent: HeaderValue,
    correlation_id: Option<HeaderValue>,
}

impl InjectHeadersMiddleware {
    pub fn new(correlation_id: Option<HeaderValue>) -> Self {
        Self {
            user_agent: HeaderValue::from_static(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            )),
            correlation_id,
        }
    }
}

#[async_trait]
impl Middleware for InjectHeadersMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let headers = req.headers_mut();
        headers.insert(USER_AGENT, self.user_agent.clone());

        if !headers.contains_key(REQUEST_ID_HEADER) {
            // A UUID is always a valid header value
            if let Ok(request_id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                headers.insert(REQUEST_ID_HEADER, request_id);
            }
        }

        if let Some(ref correlation_id) = self.correlation_id {
            if !headers.contains_key(CORRELATION_ID_HEADER) {
                headers.insert(CORRELATION_ID_HEADER, correlation_id.clone());
            }
        }

        next.run(req, extensions).await
    }
}
