// src/api/scripted.rs
//! In-memory transport that replays canned responses.
//!
//! Responses are served strictly in the order they were queued and every
//! request is recorded, so callers can assert on exactly what went over
//! the wire.

use super::types::{ApiRequest, ApiResponse};
use super::FeishuTransport;
use crate::error::AppError;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ApiResponse<String>, AppError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a 200 response with the given JSON body.
    pub fn push_json(&self, body: Value) {
        self.push_response(ApiResponse::ok(body.to_string()));
    }

    /// Queues a success envelope `{"code": 0, "msg": "success", "data": ...}`.
    pub fn push_data(&self, data: Value) {
        self.push_json(serde_json::json!({ "code": 0, "msg": "success", "data": data }));
    }

    pub fn push_response(&self, response: ApiResponse<String>) {
        self.replies.lock().push_back(Ok(response));
    }

    /// Queues a transport-level failure.
    pub fn push_error(&self, error: AppError) {
        self.replies.lock().push_back(Err(error));
    }

    pub fn with_data(self, data: Value) -> Self {
        self.push_data(data);
        self
    }

    pub fn with_json(self, body: Value) -> Self {
        self.push_json(body);
        self
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait::async_trait]
impl FeishuTransport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse<String>, AppError> {
        let endpoint = request.endpoint();
        self.requests.lock().push(request);
        match self.replies.lock().pop_front() {
            Some(reply) => reply,
            None => Err(AppError::ScriptExhausted { endpoint }),
        }
    }
}
