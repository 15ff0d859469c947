use std::borrow::Cow;

use serde_json::Value;

use crate::error::BraintreeError;

/// Reject a blank identifier before any request is made.
///
/// Blank ids are reported as not-found, with the caller's message.
pub fn require_id(id: &str, not_found: impl FnOnce() -> String) -> Result<(), BraintreeError> {
    if id.trim().is_empty() {
        return Err(BraintreeError::NotFound(not_found()));
    }
    Ok(())
}

/// Percent-encode an identifier for use as a single path segment.
pub fn path_segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Parse an optional sequence number given as text.
pub fn parse_sequence_number(raw: &str) -> Result<i64, BraintreeError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| BraintreeError::InvalidArgument("sequence_number must be an integer".into()))
}

/// Parse a sequence number from untyped JSON: integers, or strings holding one.
pub fn sequence_number_from_value(value: &Value) -> Result<Option<i64>, BraintreeError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| {
            BraintreeError::InvalidArgument("sequence_number must be an integer".into())
        }),
        Value::String(s) => parse_sequence_number(s).map(Some),
        _ => Err(BraintreeError::InvalidArgument(
            "sequence_number must be an integer".into(),
        )),
    }
}
