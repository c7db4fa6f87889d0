use crate::{
    common::CORRELATION_ID_HEADER,
    error::{ApiError, Error},
};
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;

/// Reqwest middleware which translates error responses returned from the Blink Debit APIs
/// into [`Error::ApiError`](crate::error::Error)s.
pub struct ErrorHandlingMiddleware;

#[async_trait]
impl Middleware for ErrorHandlingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        // Capture the response
        let response = next.run(req, extensions).await?;

        // Build an ApiError if the response is not a success
        if !response.status().is_success() {
            tracing::debug!("Failed HTTP request. Status code: {}", response.status());

            let api_error = api_error_from_response(response).await?;
            return Err(Error::ApiError(api_error).into());
        }

        Ok(response)
    }
}

/// Body of an error response from the Blink Debit APIs.
#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum ErrorResponseBody {
    /// Errors returned by the payments endpoints.
    Detailed {
        error: String,
        message: String,
        path: Option<String>,
        code: Option<String>,
    },
    /// Errors returned by the token endpoint.
    OAuth {
        error: String,
        error_description: Option<String>,
    },
}

async fn api_error_from_response(response: Response) -> reqwest_middleware::Result<ApiError> {
    let status = response.status();
    let correlation_id = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    // Try parsing the body as one of the known error formats,
    // but if that doesn't work, use the entire contents of the response as the error title.
    let bytes = response.bytes().await?;
    let api_error = match serde_json::from_slice::<ErrorResponseBody>(&bytes) {
        Ok(ErrorResponseBody::Detailed {
            error,
            message,
            path,
            code,
        }) => ApiError {
            status: status.as_u16(),
            title: error,
            detail: Some(message),
            code,
            path,
            correlation_id,
        },
        Ok(ErrorResponseBody::OAuth {
            error,
            error_description,
        }) => ApiError {
            status: status.as_u16(),
            title: error,
            detail: error_description,
            code: None,
            path: None,
            correlation_id,
        },
        Err(_) => ApiError {
            status: status.as_u16(),
            title: if bytes.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown Error")
                    .to_string()
            } else {
                String::from_utf8_lossy(&bytes).into_owned()
            },
            detail: None,
            code: None,
            path: None,
            correlation_id,
        },
    };

    Ok(api_error)
}
