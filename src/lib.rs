// src/lib.rs
//! feishu-connector library: typed access to Feishu/Lark wiki spaces,
//! spreadsheets, bitables and webhook chat messaging.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `FeishuErrorCode`, `ValidationError`
//! - **Configuration**: `ConnectorConfig`, `ClientSettings`
//! - **Domain types**: tokens (`NodeToken`, `TableId`, ...), credentials, records, tables
//! - **Connector**: `FeishuConnector` and the `FeishuTransport` seam
//! - **Protocols**: `fetch_all_pages`, `write_in_chunks`, `filter_records`
//! - **Messaging**: `CardMessage`, `WebhookRegistry`, `TableRenderer`
//! - **Observation**: `ConnectorObserver`, `ConnectorEvent`

pub mod api;
pub mod config;
mod connector;
mod constants;
pub mod encoding;
mod error;
pub mod messaging;
pub mod observer;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, FeishuErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::api::client::ClientSettings;
pub use crate::config::ConnectorConfig;

// --- Constants ---
pub use crate::constants::{
    BITABLE_WRITE_CHUNK, DEFAULT_WEBHOOK, FEISHU_API_BASE_URL, FEISHU_API_PAGE_SIZE,
    SHEET_APPEND_CHUNK,
};

// --- Domain Types ---
pub use crate::types::{
    AccessToken, AppCredentials, AppId, AppSecret, BitableRecord, CellValue, Fields, Id,
    ImageKey, NewRecord, NodeToken, ObjectKind, ObjectToken, RecordId, SheetRange, SpaceId,
    Table, TableId, ValidatedUrl, ViewId,
};

// --- Connector ---
pub use crate::api::{FeishuHttpClient, FeishuTransport, ScriptedTransport};
pub use crate::connector::FeishuConnector;

// --- Protocols ---
pub use crate::api::batch::{write_in_chunks, ChunkedWrite};
pub use crate::api::bitable::{filter_records, merge_fields, UpdateFailure, UpdateReport};
pub use crate::api::pagination::{fetch_all_pages, Page, PaginationResult};
pub use crate::api::responses::{
    AppendReceipt, BitableApp, BitableTable, BitableView, BlockInfo, SheetInfo, SheetMeta,
    WikiNode, WikiSpace,
};

// --- Messaging ---
pub use crate::messaging::{
    CardBody, CardButton, CardElement, CardMessage, TableRenderer, WebhookDelivery,
    WebhookRegistry,
};

// --- Observation ---
pub use crate::observer::{ConnectorEvent, ConnectorObserver, LogObserver, RecordingObserver};
