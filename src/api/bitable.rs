// src/api/bitable.rs
//! Bitable apps, tables, views and records.
//!
//! The node-level operations (`get_bitable_records`,
//! `append_bitable_records`, `update_records`) resolve the node on every
//! call, then run the paginated read or the chunked write protocol.

use super::batch::write_in_chunks;
use super::pagination::{fetch_all_pages, Page, PaginationResult};
use super::responses::{
    BatchCreateData, BitableApp, BitableAppData, BitableTable, BitableView, RecordData,
};
use super::types::ApiRequest;
use super::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::constants::{BITABLE_WRITE_CHUNK, FEISHU_API_PAGE_SIZE};
use crate::encoding::table_to_records;
use crate::error::AppError;
use crate::observer::ConnectorEvent;
use crate::types::{
    BitableRecord, Fields, NewRecord, NodeToken, ObjectToken, RecordId, Table, TableId,
};
use serde_json::json;

const BITABLE_APPS_ENDPOINT: &str = "/bitable/v1/apps";

fn records_endpoint(app: &ObjectToken, table: &TableId) -> String {
    format!("{}/{}/tables/{}/records", BITABLE_APPS_ENDPOINT, app, table)
}

/// Keeps the records whose fields contain every condition with an equal value.
///
/// Equality is JSON equality: `1` does not match `"1"`. A condition on a
/// field the record lacks never matches; empty conditions keep everything.
pub fn filter_records<'a>(records: &'a [BitableRecord], conditions: &Fields) -> Vec<&'a BitableRecord> {
    records
        .iter()
        .filter(|record| {
            conditions
                .iter()
                .all(|(field, expected)| record.fields.get(field) == Some(expected))
        })
        .collect()
}

/// Merges `updates` over `existing`; updated fields win, others are kept.
pub fn merge_fields(existing: &Fields, updates: &Fields) -> Fields {
    let mut merged = existing.clone();
    for (field, value) in updates {
        merged.insert(field.clone(), value.clone());
    }
    merged
}

/// One record that could not be updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFailure {
    pub record_id: RecordId,
    pub error: String,
}

/// Outcome of a conditional multi-record update.
///
/// Individual failures do not abort the run; `matched` always equals
/// `updated + failures.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: usize,
    pub updated: usize,
    pub failures: Vec<UpdateFailure>,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<T: FeishuTransport> FeishuConnector<T> {
    pub async fn get_bitable_app(&self, app: &ObjectToken) -> Result<BitableApp, AppError> {
        let request = ApiRequest::get(format!("{}/{}", BITABLE_APPS_ENDPOINT, app));
        let data: BitableAppData = self.call(request).await?;
        Ok(data.app)
    }

    pub async fn list_bitable_tables(&self, app: &ObjectToken) -> Result<Vec<BitableTable>, AppError> {
        self.list_all(&format!("{}/{}/tables/", BITABLE_APPS_ENDPOINT, app))
            .await
    }

    pub async fn list_bitable_views(
        &self,
        app: &ObjectToken,
        table: &TableId,
    ) -> Result<Vec<BitableView>, AppError> {
        self.list_all(&format!(
            "{}/{}/tables/{}/views",
            BITABLE_APPS_ENDPOINT, app, table
        ))
        .await
    }

    /// Reads every record of a table, pages concatenated in fetch order.
    ///
    /// Any failing page fails the whole read; no partial result is returned.
    pub async fn fetch_all_records(
        &self,
        app: &ObjectToken,
        table: &TableId,
    ) -> Result<Vec<BitableRecord>, AppError> {
        Ok(self.fetch_record_pages(app, table).await?.items)
    }

    async fn fetch_record_pages(
        &self,
        app: &ObjectToken,
        table: &TableId,
    ) -> Result<PaginationResult<BitableRecord>, AppError> {
        let endpoint = records_endpoint(app, table);
        fetch_all_pages(&endpoint, |cursor| {
            let mut request = ApiRequest::get(endpoint.clone()).query("page_size", FEISHU_API_PAGE_SIZE);
            if let Some(cursor) = cursor {
                request = request.query("page_token", cursor);
            }
            let endpoint = endpoint.clone();
            async move {
                let page: Page<BitableRecord> = self.call(request).await?;
                self.emit(ConnectorEvent::PageFetched {
                    endpoint,
                    items: page.items.as_ref().map_or(0, Vec::len),
                    total: page.total,
                    has_more: page.has_more,
                });
                Ok(page)
            }
        })
        .await
    }

    /// Reads every record of a table behind a wiki node.
    pub async fn get_bitable_records(
        &self,
        node: &NodeToken,
        table: &TableId,
    ) -> Result<Vec<BitableRecord>, AppError> {
        let app = self.resolve_table(node, table).await?;
        let result = self.fetch_record_pages(&app, table).await?;
        self.emit(ConnectorEvent::RecordsFetched {
            node: node.to_string(),
            table: table.to_string(),
            requests: result.pages_fetched,
            total_reported: result.total_reported,
            records: result.items.len(),
        });
        Ok(result.items)
    }

    /// Creates up to 100 records in one request.
    pub async fn batch_create_records(
        &self,
        app: &ObjectToken,
        table: &TableId,
        records: &[NewRecord],
    ) -> Result<Vec<BitableRecord>, AppError> {
        let data: BatchCreateData = self.call(batch_create_request(app, table, records)).await?;
        self.emit(ConnectorEvent::RecordsCreated {
            table: table.to_string(),
            records: records.len(),
        });
        Ok(data.records)
    }

    /// Appends plain field mappings to a table behind a wiki node, 100
    /// records per request. Returns the number of records submitted.
    pub async fn append_bitable_records(
        &self,
        node: &NodeToken,
        table: &TableId,
        records: Vec<Fields>,
    ) -> Result<usize, AppError> {
        let records: Vec<NewRecord> = records.into_iter().map(NewRecord::new).collect();
        self.append_new_records(node, table, &records).await
    }

    /// Deprecated name of [`append_bitable_records`](Self::append_bitable_records).
    #[deprecated(note = "use append_bitable_records")]
    pub async fn insert_bitable_records(
        &self,
        node: &NodeToken,
        table: &TableId,
        records: Vec<Fields>,
    ) -> Result<usize, AppError> {
        log::warn!("insert_bitable_records will be replaced by append_bitable_records");
        self.append_bitable_records(node, table, records).await
    }

    /// Appends a tabular batch. Every row gets a generated record id and
    /// date cells are sent as epoch milliseconds.
    pub async fn append_table_records(
        &self,
        node: &NodeToken,
        table: &TableId,
        rows: &Table,
    ) -> Result<usize, AppError> {
        let records = table_to_records(rows);
        self.append_new_records(node, table, &records).await
    }

    /// Chunked batch-create. A failing chunk aborts the write; earlier
    /// chunks are not rolled back.
    pub async fn append_new_records(
        &self,
        node: &NodeToken,
        table: &TableId,
        records: &[NewRecord],
    ) -> Result<usize, AppError> {
        let app = self.resolve_table(node, table).await?;
        let destination = format!("{}/{}", node, table);

        let outcome = write_in_chunks(&destination, records, BITABLE_WRITE_CHUNK, |_, chunk| {
            let request = batch_create_request(&app, table, chunk);
            let destination = destination.clone();
            let items = chunk.len();
            async move {
                let _: BatchCreateData = self.call(request).await?;
                self.emit(ConnectorEvent::ChunkWritten { destination, items });
                Ok(())
            }
        })
        .await?;

        self.emit(ConnectorEvent::WriteCompleted {
            destination,
            requests: outcome.requests,
            written: outcome.items_written,
            submitted: records.len(),
        });
        Ok(outcome.items_written)
    }

    /// Replaces the fields of one record.
    pub async fn update_record(
        &self,
        app: &ObjectToken,
        table: &TableId,
        record_id: &RecordId,
        fields: &Fields,
    ) -> Result<BitableRecord, AppError> {
        let request = ApiRequest::put(format!("{}/{}", records_endpoint(app, table), record_id))
            .json(json!({ "fields": fields }));
        let data: RecordData = self.call(request).await?;
        Ok(data.record)
    }

    /// Updates every record matching `conditions`, one request per match,
    /// merging `updates` over each record's existing fields.
    ///
    /// Resolution and the initial read abort on failure. Per-record
    /// failures are collected into the report and the run continues.
    pub async fn update_records(
        &self,
        node: &NodeToken,
        table: &TableId,
        conditions: &Fields,
        updates: &Fields,
    ) -> Result<UpdateReport, AppError> {
        let app = self.resolve_table(node, table).await?;
        let records = self.fetch_all_records(&app, table).await?;
        let matches = filter_records(&records, conditions);

        let mut report = UpdateReport {
            matched: matches.len(),
            ..UpdateReport::default()
        };

        for record in matches {
            let fields = merge_fields(&record.fields, updates);
            match self.update_record(&app, table, &record.record_id, &fields).await {
                Ok(_) => report.updated += 1,
                Err(e) => {
                    self.emit(ConnectorEvent::RecordUpdateFailed {
                        record_id: record.record_id.to_string(),
                        error: e.to_string(),
                    });
                    report.failures.push(UpdateFailure {
                        record_id: record.record_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        self.emit(ConnectorEvent::UpdateCompleted {
            node: node.to_string(),
            table: table.to_string(),
            matched: report.matched,
            updated: report.updated,
            failed: report.failures.len(),
        });
        Ok(report)
    }
}

fn batch_create_request(app: &ObjectToken, table: &TableId, records: &[NewRecord]) -> ApiRequest {
    ApiRequest::post(format!("{}/batch_create", records_endpoint(app, table)))
        .json(json!({ "records": records }))
}
