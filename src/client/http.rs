//! Shared HTTP plumbing: client construction, sending, and status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Longest response body excerpt written to logs.
pub const LOG_BODY_LIMIT: usize = 1000;

/// Build the pooled reqwest client for a configuration.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .pool_max_idle_per_host(10)
        .default_headers(json_headers())
        .build()
        .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Default headers for the JSON API.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Send a request and read the whole body.
///
/// Transport timeouts become [`ClientError::Timeout`]; every other
/// transport failure is a [`ClientError::Connection`].
pub async fn send(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<(StatusCode, String), ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout))?;
    Ok((status, body))
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(timeout.as_millis() as u64)
    } else {
        ClientError::Connection(err)
    }
}

/// Map a non-2xx status to an error, keeping the body for diagnostics.
pub fn status_to_error(status: StatusCode, body: &str) -> ClientError {
    ClientError::protocol(status.as_u16(), body.trim())
}

/// Truncate a body at a char boundary for logging.
pub fn truncate_for_log(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Percent-encode one URL path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
