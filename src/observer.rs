// src/observer.rs
//! Structured connector events and the sinks that receive them.
//!
//! The connector never logs protocol milestones directly; it emits a
//! `ConnectorEvent` to an injected observer. `LogObserver` forwards to the
//! `log` facade, `RecordingObserver` keeps events for inspection.

use parking_lot::Mutex;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorEvent {
    TokenIssued {
        app_id: String,
    },
    TableResolved {
        node: String,
        kind: String,
        object_token: String,
        table: String,
    },
    PageFetched {
        endpoint: String,
        items: usize,
        total: Option<u64>,
        has_more: bool,
    },
    RecordsFetched {
        node: String,
        table: String,
        requests: u32,
        total_reported: Option<u64>,
        records: usize,
    },
    SheetRead {
        sheet: String,
        range: String,
        rows: usize,
    },
    RowsAppended {
        sheet: String,
        range: String,
        updated_rows: u64,
        updated_cells: u64,
    },
    RecordsCreated {
        table: String,
        records: usize,
    },
    ChunkWritten {
        destination: String,
        items: usize,
    },
    WriteCompleted {
        destination: String,
        requests: usize,
        written: usize,
        submitted: usize,
    },
    RecordUpdateFailed {
        record_id: String,
        error: String,
    },
    UpdateCompleted {
        node: String,
        table: String,
        matched: usize,
        updated: usize,
        failed: usize,
    },
    ImageUploaded {
        image_key: String,
        log_id: Option<String>,
    },
    WebhookDelivered {
        target: String,
        response: String,
    },
    WebhookSkipped {
        target: String,
    },
    SnapshotFailed {
        title: String,
        error: String,
    },
}

impl ConnectorEvent {
    /// Events that report a tolerated failure.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::RecordUpdateFailed { .. } | Self::WebhookSkipped { .. } | Self::SnapshotFailed { .. }
        )
    }
}

impl fmt::Display for ConnectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenIssued { app_id } => write!(f, "access token fetched for app {}", app_id),
            Self::TableResolved {
                node,
                kind,
                object_token,
                table,
            } => write!(
                f,
                "[bitable] resolved (node){} (kind){} (bi){} (table){}",
                node, kind, object_token, table
            ),
            Self::PageFetched {
                endpoint,
                items,
                total,
                has_more,
            } => write!(
                f,
                "page fetched from {} (num){} (total){} (has_more){}",
                endpoint,
                items,
                total.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
                has_more
            ),
            Self::RecordsFetched {
                node,
                table,
                requests,
                total_reported,
                records,
            } => write!(
                f,
                "records from {} table {} with {} requests. ApiTotal={}, RecordNum={}",
                node,
                table,
                requests,
                total_reported
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                records
            ),
            Self::SheetRead { sheet, range, rows } => write!(
                f,
                "sheet data fetched. (sheet){} (sheet_range){} (rows){}",
                sheet, range, rows
            ),
            Self::RowsAppended {
                sheet,
                range,
                updated_rows,
                updated_cells,
            } => write!(
                f,
                "sheet data appended. (sheet){} (sheet_range){} (cells){} (rows){}",
                sheet, range, updated_cells, updated_rows
            ),
            Self::RecordsCreated { table, records } => write!(
                f,
                "bitable records inserted. (table_id){} (num){}",
                table, records
            ),
            Self::ChunkWritten { destination, items } => {
                write!(f, "chunk written to {} (num){}", destination, items)
            }
            Self::WriteCompleted {
                destination,
                requests,
                written,
                submitted,
            } => write!(
                f,
                "data to {} with {} requests. ItemNum={}, RecordNum={}",
                destination, requests, written, submitted
            ),
            Self::RecordUpdateFailed { record_id, error } => {
                write!(f, "failed to update record {}: {}", record_id, error)
            }
            Self::UpdateCompleted {
                node,
                table,
                matched,
                updated,
                failed,
            } => write!(
                f,
                "updated {}/{} records in {} table {} ({} failed)",
                updated, matched, node, table, failed
            ),
            Self::ImageUploaded { image_key, log_id } => write!(
                f,
                "image uploaded: {} (log id {})",
                image_key,
                log_id.as_deref().unwrap_or("-")
            ),
            Self::WebhookDelivered { target, response } => {
                write!(f, "webhook {} answered: {}", target, response)
            }
            Self::WebhookSkipped { target } => {
                write!(f, "cannot find proper webhook for target {}", target)
            }
            Self::SnapshotFailed { title, error } => {
                write!(f, "table snapshot '{}' not sent: {}", title, error)
            }
        }
    }
}

/// Receives connector events.
pub trait ConnectorObserver: Send + Sync {
    fn on_event(&self, event: &ConnectorEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ConnectorObserver for LogObserver {
    fn on_event(&self, event: &ConnectorEvent) {
        match event {
            ConnectorEvent::PageFetched { .. }
            | ConnectorEvent::ChunkWritten { .. }
            | ConnectorEvent::RecordsCreated { .. } => {
                log::debug!("[feishu] {}", event)
            }
            e if e.is_warning() => log::warn!("[feishu] {}", event),
            _ => log::info!("[feishu] {}", event),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ConnectorEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConnectorEvent> {
        self.events.lock().clone()
    }

    pub fn warnings(&self) -> Vec<ConnectorEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }
}

impl ConnectorObserver for RecordingObserver {
    fn on_event(&self, event: &ConnectorEvent) {
        self.events.lock().push(event.clone());
    }
}
