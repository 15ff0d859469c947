/// Gateway API version sent in the `X-ApiVersion` header.
pub const API_VERSION: &str = "6";

/// Base URL of a locally running gateway.
pub const DEVELOPMENT_URL: &str = "http://localhost:3000";

/// Base URL of the sandbox gateway.
pub const SANDBOX_URL: &str = "https://api.sandbox.braintreegateway.com:443";

/// Base URL of the production gateway.
pub const PRODUCTION_URL: &str = "https://api.braintreegateway.com:443";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Response key carrying an API-level error payload.
pub const API_ERROR_RESPONSE: &str = "api_error_response";

/// Response key carrying a single dispute record.
pub const DISPUTE_KEY: &str = "dispute";

/// Response key carrying a dispute search page.
pub const DISPUTES_KEY: &str = "disputes";

/// Response key carrying a single evidence record.
pub const EVIDENCE_KEY: &str = "evidence";

/// Response key carrying a payment method nonce.
pub const PAYMENT_METHOD_NONCE_KEY: &str = "payment_method_nonce";
