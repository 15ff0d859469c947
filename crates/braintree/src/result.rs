//! Result wrappers and the response dispatch rule shared by every gateway.
//!
//! A decoded response that carries `api_error_response` is an API-level
//! error and becomes [`GatewayResult::Error`], regardless of any other
//! fields present. Anything else is a success, optionally wrapping a named
//! field of the response.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::API_ERROR_RESPONSE;
use crate::error::BraintreeError;
use crate::transport::ResponseBody;

/// Outcome of a gateway call that reached the API.
#[derive(Debug)]
pub enum GatewayResult<T> {
    Success(T),
    Error(ErrorResult),
}

impl<T> GatewayResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, GatewayResult::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            GatewayResult::Success(value) => Some(value),
            GatewayResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResult> {
        match self {
            GatewayResult::Success(_) => None,
            GatewayResult::Error(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, ErrorResult> {
        match self {
            GatewayResult::Success(value) => Ok(value),
            GatewayResult::Error(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GatewayResult<U> {
        match self {
            GatewayResult::Success(value) => GatewayResult::Success(f(value)),
            GatewayResult::Error(e) => GatewayResult::Error(e),
        }
    }
}

/// Structured error payload parsed from `api_error_response`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResult {
    pub message: String,
    pub errors: ValidationErrors,
    /// Request parameters echoed back by the gateway.
    pub params: Value,
}

impl ErrorResult {
    pub fn from_value(payload: Value) -> Result<Self, BraintreeError> {
        let Value::Object(mut map) = payload else {
            return Err(BraintreeError::MalformedResponse(format!(
                "{API_ERROR_RESPONSE} must be an object"
            )));
        };

        let message = match map.remove("message") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let errors = match map.get("errors") {
            Some(v) => ValidationErrors::from_value(v)?,
            None => ValidationErrors::default(),
        };
        let params = map.remove("params").unwrap_or(Value::Null);

        Ok(Self {
            message,
            errors,
            params,
        })
    }
}

/// A single validation failure reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub attribute: String,
    pub code: String,
    pub message: String,
}

impl ValidationError {
    fn from_value(value: &Value) -> Result<Self, BraintreeError> {
        let field = |name: &str| match value.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        if !value.is_object() {
            return Err(BraintreeError::MalformedResponse(
                "validation error must be an object".to_string(),
            ));
        }
        Ok(Self {
            attribute: field("attribute"),
            code: field("code"),
            message: field("message"),
        })
    }
}

/// Tree of validation errors, keyed by the object they were raised on.
///
/// Each level has its own `errors` list plus nested levels, mirroring the
/// request structure (e.g. `dispute` → `evidence`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
    nested: BTreeMap<String, ValidationErrors>,
}

impl ValidationErrors {
    pub fn from_value(value: &Value) -> Result<Self, BraintreeError> {
        let Some(map) = value.as_object() else {
            return Err(BraintreeError::MalformedResponse(
                "validation errors must be an object".to_string(),
            ));
        };

        let mut collection = ValidationErrors::default();
        for (key, v) in map {
            if key == "errors" {
                // A single error may arrive unwrapped.
                match v {
                    Value::Array(items) => {
                        for item in items {
                            collection.errors.push(ValidationError::from_value(item)?);
                        }
                    }
                    Value::Object(_) => collection.errors.push(ValidationError::from_value(v)?),
                    _ => {}
                }
            } else if v.is_object() {
                collection
                    .nested
                    .insert(key.clone(), ValidationErrors::from_value(v)?);
            }
        }
        Ok(collection)
    }

    /// Errors raised directly on this level.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Errors on this level for the given attribute.
    pub fn on(&self, attribute: &str) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.attribute == attribute)
            .collect()
    }

    /// Nested errors for the given object key.
    pub fn for_object(&self, key: &str) -> Option<&ValidationErrors> {
        self.nested.get(key)
    }

    /// Every error in this level and all nested levels.
    pub fn deep_errors(&self) -> Vec<&ValidationError> {
        let mut all: Vec<&ValidationError> = self.errors.iter().collect();
        for child in self.nested.values() {
            all.extend(child.deep_errors());
        }
        all
    }

    pub fn size(&self) -> usize {
        self.errors.len()
    }

    pub fn deep_size(&self) -> usize {
        self.errors.len() + self.nested.values().map(|c| c.deep_size()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.deep_size() == 0
    }
}

/// Apply the dispatch rule to a decoded response.
///
/// The error key is checked first. On success the remaining body is handed
/// to `on_success` to extract the wrapped value.
pub fn dispatch<T>(
    mut body: ResponseBody,
    on_success: impl FnOnce(ResponseBody) -> Result<T, BraintreeError>,
) -> Result<GatewayResult<T>, BraintreeError> {
    if let Some(payload) = body.remove(API_ERROR_RESPONSE) {
        let error = ErrorResult::from_value(payload)?;
        tracing::warn!(
            error_message = %error.message,
            errors = error.errors.deep_size(),
            "gateway returned error result"
        );
        return Ok(GatewayResult::Error(error));
    }
    on_success(body).map(GatewayResult::Success)
}

/// Remove and decode a named field from a response body.
pub fn take_field<T: DeserializeOwned>(
    body: &mut ResponseBody,
    key: &str,
) -> Result<T, BraintreeError> {
    let value = body
        .remove(key)
        .ok_or_else(|| BraintreeError::MalformedResponse(format!("response is missing `{key}`")))?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: Value) -> ResponseBody {
        match v {
            Value::Object(map) => map,
            _ => unreachable!("test bodies are objects"),
        }
    }

    fn error_payload() -> Value {
        json!({
            "message": "Evidence content cannot be blank",
            "errors": {
                "errors": [],
                "dispute": {
                    "errors": [
                        {"attribute": "status", "code": "95701", "message": "Dispute can only be accepted when it is open"}
                    ],
                    "evidence": {
                        "errors": [
                            {"attribute": "comments", "code": 95708, "message": "Content cannot be blank"}
                        ]
                    }
                }
            },
            "params": {"dispute": {"id": "abc"}}
        })
    }

    #[test]
    fn error_key_wins_over_success_fields() {
        let response = body(json!({
            "api_error_response": error_payload(),
            "evidence": {"id": "ev_1"}
        }));
        let result = dispatch(response, |mut b| take_field::<Value>(&mut b, "evidence")).unwrap();
        assert!(!result.is_success());
        assert_eq!(
            result.error().unwrap().message,
            "Evidence content cannot be blank"
        );
    }

    #[test]
    fn success_without_error_key_extracts_field() {
        let response = body(json!({"evidence": {"id": "ev_1"}}));
        let result = dispatch(response, |mut b| take_field::<Value>(&mut b, "evidence")).unwrap();
        assert_eq!(result.success().unwrap()["id"], "ev_1");
    }

    #[test]
    fn success_missing_required_field_is_malformed() {
        let err = dispatch(ResponseBody::new(), |mut b| {
            take_field::<Value>(&mut b, "evidence")
        })
        .unwrap_err();
        assert!(matches!(err, BraintreeError::MalformedResponse(_)));
    }

    #[test]
    fn unit_success_on_empty_body() {
        let result = dispatch(ResponseBody::new(), |_| Ok(())).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn error_result_parses_nested_validation_errors() {
        let error = ErrorResult::from_value(error_payload()).unwrap();
        assert_eq!(error.errors.size(), 0);
        assert_eq!(error.errors.deep_size(), 2);

        let dispute = error.errors.for_object("dispute").unwrap();
        assert_eq!(dispute.on("status")[0].code, "95701");

        let evidence = dispute.for_object("evidence").unwrap();
        // Numeric codes are normalised to strings.
        assert_eq!(evidence.errors()[0].code, "95708");
        assert_eq!(error.params["dispute"]["id"], "abc");
    }

    #[test]
    fn error_result_rejects_non_object_payload() {
        assert!(ErrorResult::from_value(json!("boom")).is_err());
    }

    #[test]
    fn into_result_and_map() {
        let ok: GatewayResult<u32> = GatewayResult::Success(2);
        assert_eq!(ok.map(|v| v * 2).into_result().unwrap(), 4);

        let err: GatewayResult<u32> =
            GatewayResult::Error(ErrorResult::from_value(error_payload()).unwrap());
        assert!(err.into_result().is_err());
    }
}
