use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::BraintreeError;
use crate::transport::{ResponseBody, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory transport that records every request and replays queued
/// responses in order. An empty queue answers with `{}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<Result<ResponseBody, BraintreeError>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, body: Value) {
        let Value::Object(map) = body else {
            panic!("queued responses must be JSON objects");
        };
        self.responses.lock().unwrap().push_back(Ok(map));
    }

    pub fn fail(&self, error: BraintreeError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ResponseBody, BraintreeError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ResponseBody::new()))
    }
}

impl Transport for RecordingTransport {
    async fn get(&self, path: &str) -> Result<ResponseBody, BraintreeError> {
        self.record("GET", path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ResponseBody, BraintreeError> {
        self.record("POST", path, Some(body))
    }

    async fn put(&self, path: &str, body: Option<&Value>) -> Result<ResponseBody, BraintreeError> {
        self.record("PUT", path, body)
    }

    async fn delete(&self, path: &str) -> Result<ResponseBody, BraintreeError> {
        self.record("DELETE", path, None)
    }
}
