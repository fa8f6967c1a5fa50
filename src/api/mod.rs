// src/api/mod.rs
//! Open platform interaction: transport, envelopes, and the endpoint
//! wrappers built on top of them.
//!
//! Endpoint wrappers live in `impl FeishuConnector` blocks spread over
//! `auth`, `resolver`, `wiki`, `sheets` and `bitable`. The protocol loops
//! (`pagination`, `batch`) know nothing about HTTP.

pub mod auth;
pub mod batch;
pub mod bitable;
pub mod client;
pub mod envelope;
pub mod pagination;
pub mod resolver;
pub mod responses;
pub mod scripted;
pub mod sheets;
pub mod types;
pub mod wiki;

use crate::error::AppError;
use types::{ApiRequest, ApiResponse};

/// The ability to perform one HTTP round trip against the platform.
///
/// Everything above this trait is transport-agnostic; tests substitute a
/// scripted implementation.
#[async_trait::async_trait]
pub trait FeishuTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse<String>, AppError>;
}

#[async_trait::async_trait]
impl<T: FeishuTransport + ?Sized> FeishuTransport for std::sync::Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse<String>, AppError> {
        (**self).execute(request).await
    }
}

// Re-export the public interface
pub use batch::{write_in_chunks, ChunkedWrite};
pub use client::{ClientSettings, FeishuHttpClient};
pub use pagination::{fetch_all_pages, Page, PaginationResult};
pub use scripted::ScriptedTransport;
