//! The HTTP seam every gateway talks through.
//!
//! [`crate::HttpTransport`] is the production implementation. Tests and
//! embedders can supply their own.

use serde_json::{Map, Value};

use crate::error::BraintreeError;

/// Decoded JSON object of a gateway response body.
pub type ResponseBody = Map<String, Value>;

/// Transport collaborator: performs one request and decodes the body.
///
/// Paths are relative to the gateway host and already include the merchant
/// base path. Implementations must report HTTP 404 as
/// [`BraintreeError::NotFound`]; gateways rely on that to produce their
/// resource-specific messages.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<ResponseBody, BraintreeError>> + Send;

    fn post(
        &self,
        path: &str,
        body: &Value,
    ) -> impl std::future::Future<Output = Result<ResponseBody, BraintreeError>> + Send;

    fn put(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl std::future::Future<Output = Result<ResponseBody, BraintreeError>> + Send;

    fn delete(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<ResponseBody, BraintreeError>> + Send;
}
