// src/api/types.rs
//! Request and response shapes shared by every transport.
//!
//! A request is plain data: the transport decides how to put it on the
//! wire, tests decide how to answer it.

use crate::types::{AccessToken, ValidatedUrl};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Where a request goes: an API path under the configured base URL, or a
/// caller-supplied absolute URL (webhooks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    Api(String),
    Absolute(ValidatedUrl),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart image upload: an `image_type` text part and an `image` file part.
    ImageUpload {
        image_type: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// One HTTP round trip, described as data.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub target: RequestTarget,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<AccessToken>,
}

impl ApiRequest {
    fn new(method: HttpMethod, target: RequestTarget) -> Self {
        Self {
            method,
            target,
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, RequestTarget::Api(path.into()))
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, RequestTarget::Api(path.into()))
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, RequestTarget::Api(path.into()))
    }

    /// A POST to a webhook URL; webhooks take no bearer token.
    pub fn webhook(url: ValidatedUrl) -> Self {
        Self::new(HttpMethod::Post, RequestTarget::Absolute(url))
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn image(mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::ImageUpload {
            image_type: "message".to_string(),
            file_name: file_name.into(),
            bytes,
        };
        self
    }

    pub fn bearer(mut self, token: &AccessToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }

    /// Human-readable endpoint used in errors and logs.
    pub fn endpoint(&self) -> String {
        match &self.target {
            RequestTarget::Api(path) => path.clone(),
            RequestTarget::Absolute(url) => url.to_string(),
        }
    }

    /// Looks up a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The JSON body, if this request carries one.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
    /// Platform request id from the `X-Tt-Logid` header
    pub log_id: Option<String>,
}

impl ApiResponse<String> {
    /// A 200 response with the given body; used by non-network transports.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            data: body.into(),
            status: reqwest::StatusCode::OK,
            url: String::new(),
            log_id: None,
        }
    }

    pub fn with_status(mut self, status: reqwest::StatusCode) -> Self {
        self.status = status;
        self
    }
}
