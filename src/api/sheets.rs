// src/api/sheets.rs
//! Spreadsheet metadata, range reads and chunked appends.

use super::batch::write_in_chunks;
use super::responses::{AppendData, AppendReceipt, SheetMeta, ValueRangeData};
use super::types::ApiRequest;
use super::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::constants::SHEET_APPEND_CHUNK;
use crate::encoding::encode_sheet_rows;
use crate::error::AppError;
use crate::observer::ConnectorEvent;
use crate::types::{CellValue, NodeToken, ObjectToken, SheetRange};
use serde_json::{json, Value};

const SPREADSHEETS_ENDPOINT: &str = "/sheets/v2/spreadsheets";

impl<T: FeishuTransport> FeishuConnector<T> {
    pub async fn get_sheet_meta(&self, sheet: &ObjectToken) -> Result<SheetMeta, AppError> {
        let request = ApiRequest::get(format!("{}/{}/metainfo", SPREADSHEETS_ENDPOINT, sheet));
        self.call(request).await
    }

    /// Reads the raw cell values of a range. An empty range yields no rows.
    pub async fn read_sheet_range(
        &self,
        sheet: &ObjectToken,
        range: &SheetRange,
    ) -> Result<Vec<Vec<Value>>, AppError> {
        let request = ApiRequest::get(format!(
            "{}/{}/values/{}",
            SPREADSHEETS_ENDPOINT, sheet, range
        ));
        let data: ValueRangeData = self.call(request).await?;
        let values = data.value_range.values.unwrap_or_default();
        self.emit(ConnectorEvent::SheetRead {
            sheet: sheet.to_string(),
            range: range.to_string(),
            rows: values.len(),
        });
        Ok(values)
    }

    /// Appends rows below the data already in `range`, in a single request.
    pub async fn append_sheet_rows(
        &self,
        sheet: &ObjectToken,
        range: &SheetRange,
        rows: &[Vec<CellValue>],
    ) -> Result<AppendReceipt, AppError> {
        let request = self.append_request(sheet, range, rows);
        let data: AppendData = self.call(request).await?;
        self.emit(ConnectorEvent::RowsAppended {
            sheet: sheet.to_string(),
            range: range.to_string(),
            updated_rows: data.updates.updated_rows,
            updated_cells: data.updates.updated_cells,
        });
        Ok(data.updates)
    }

    fn append_request(
        &self,
        sheet: &ObjectToken,
        range: &SheetRange,
        rows: &[Vec<CellValue>],
    ) -> ApiRequest {
        ApiRequest::post(format!("{}/{}/values_append", SPREADSHEETS_ENDPOINT, sheet)).json(json!({
            "valueRange": {
                "range": range.as_str(),
                "values": encode_sheet_rows(rows),
            }
        }))
    }

    /// Reads a range from the spreadsheet behind a wiki node.
    pub async fn get_sheet_data(
        &self,
        node: &NodeToken,
        range: &SheetRange,
    ) -> Result<Vec<Vec<Value>>, AppError> {
        let sheet = self.resolve_object(node).await?;
        self.read_sheet_range(&sheet, range).await
    }

    /// Appends rows to the spreadsheet behind a wiki node, 5000 rows per
    /// request. Returns the number of rows submitted.
    ///
    /// A failing request aborts the append; earlier chunks stay written.
    pub async fn append_sheet_data(
        &self,
        node: &NodeToken,
        range: &SheetRange,
        rows: &[Vec<CellValue>],
    ) -> Result<usize, AppError> {
        let sheet = self.resolve_object(node).await?;
        let destination = format!("{}/{}", node, range);

        let outcome = write_in_chunks(&destination, rows, SHEET_APPEND_CHUNK, |_, chunk| {
            let request = self.append_request(&sheet, range, chunk);
            let destination = destination.clone();
            let items = chunk.len();
            async move {
                let _: AppendData = self.call(request).await?;
                self.emit(ConnectorEvent::ChunkWritten { destination, items });
                Ok(())
            }
        })
        .await?;

        self.emit(ConnectorEvent::WriteCompleted {
            destination,
            requests: outcome.requests,
            written: outcome.items_written,
            submitted: rows.len(),
        });
        Ok(outcome.items_written)
    }
}
