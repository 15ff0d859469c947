use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Method;
use serde_json::Value;

use crate::config::Configuration;
use crate::constants::API_VERSION;
use crate::error::BraintreeError;
use crate::transport::{ResponseBody, Transport};

const CLIENT_USER_AGENT: &str = concat!("Braintree Rust ", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by `reqwest::Client`.
///
/// Authenticates with the merchant's public/private key pair and speaks
/// JSON. A 422 body is decoded like a success: it carries the
/// `api_error_response` payload that gateways turn into an error result.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    public_key: String,
    private_key: String,
}

impl HttpTransport {
    pub fn new(config: &Configuration) -> Result<Self, BraintreeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert("x-apiversion", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| BraintreeError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(config, http))
    }

    /// Create a transport with a custom reqwest::Client.
    pub fn with_http_client(config: &Configuration, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.environment.base_url(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ResponseBody, BraintreeError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path = %path, "gateway request");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.public_key, Some(&self.private_key));
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                BraintreeError::Timeout(format!("{method} {path}"))
            } else {
                BraintreeError::Http(format!("request failed: {e}"))
            }
        })?;

        let status = resp.status().as_u16();
        if let Some(err) = status_error(status) {
            tracing::warn!(method = %method, path = %path, status, "gateway returned error status");
            return Err(err);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| BraintreeError::Http(format!("failed to read response body: {e}")))?;
        decode_body(&bytes)
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<ResponseBody, BraintreeError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ResponseBody, BraintreeError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Option<&Value>) -> Result<ResponseBody, BraintreeError> {
        self.send(Method::PUT, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<ResponseBody, BraintreeError> {
        self.send(Method::DELETE, path, None).await
    }
}

/// Map an HTTP status to the error it signals, if any.
fn status_error(status: u16) -> Option<BraintreeError> {
    match status {
        200..=299 | 422 => None,
        401 => Some(BraintreeError::Authentication),
        403 => Some(BraintreeError::Authorization),
        404 => Some(BraintreeError::NotFound("resource not found".to_string())),
        426 => Some(BraintreeError::UpgradeRequired),
        429 => Some(BraintreeError::TooManyRequests),
        500 => Some(BraintreeError::ServerError),
        503 => Some(BraintreeError::ServiceUnavailable),
        other => Some(BraintreeError::UnexpectedStatus(other)),
    }
}

/// Decode a response body into a JSON object. Empty bodies (204, bare PUTs)
/// decode to an empty object.
fn decode_body(bytes: &[u8]) -> Result<ResponseBody, BraintreeError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseBody::new());
    }
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(BraintreeError::MalformedResponse(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
