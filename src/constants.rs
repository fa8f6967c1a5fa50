// src/constants.rs
//! Domain constants that define the operational boundaries of the connector.
//!
//! Each constant is named for the platform limit it encodes.

// ---------------------------------------------------------------------------
// Open platform endpoints
// ---------------------------------------------------------------------------

/// Default base URL of the open platform REST API.
pub const FEISHU_API_BASE_URL: &str = "https://open.feishu.cn/open-apis";

/// Response header carrying the platform's request log id, quoted in support tickets.
pub const FEISHU_LOG_ID_HEADER: &str = "X-Tt-Logid";

/// Webhook registry key used when a message names no target.
pub const DEFAULT_WEBHOOK: &str = "default";

// ---------------------------------------------------------------------------
// Paging and batching limits
// ---------------------------------------------------------------------------

/// Records per page when listing. The platform maximum for bitable records.
pub const FEISHU_API_PAGE_SIZE: u32 = 100;

/// Records per `batch_create` request. The platform rejects larger batches.
pub const BITABLE_WRITE_CHUNK: usize = 100;

/// Rows per `values_append` request.
pub const SHEET_APPEND_CHUNK: usize = 5000;

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum characters shown when previewing response bodies in logs.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
