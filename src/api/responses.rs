// src/api/responses.rs
//! `data` payloads of the endpoints this crate consumes.
//!
//! Only the fields the connector reads are modelled; everything is
//! defaulted so that sparse responses still decode.

use crate::types::{BitableRecord, ObjectKind, ObjectToken, SpaceId, TableId, ViewId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token issuance reply. Unlike every other endpoint its payload sits at
/// the top level, not under `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct TenantTokenResponse {
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub tenant_access_token: Option<String>,
    #[serde(default)]
    pub expire: Option<u64>,
}

// --- Wiki ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiSpace {
    pub space_id: SpaceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiNode {
    #[serde(default)]
    pub space_id: Option<SpaceId>,
    pub node_token: String,
    pub obj_token: ObjectToken,
    pub obj_type: ObjectKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub parent_node_token: Option<String>,
    #[serde(default)]
    pub has_child: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeData {
    pub node: WikiNode,
}

// --- Sheets ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub block_token: String,
    #[serde(default)]
    pub block_type: String,
}

impl BlockInfo {
    /// Splits `{app}_{table}` on the first underscore.
    pub fn app_and_table(&self) -> Option<(&str, &str)> {
        self.block_token.split_once('_')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    pub sheet_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub column_count: u64,
    #[serde(default)]
    pub block_info: Option<BlockInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sheet_count: u32,
    #[serde(default)]
    pub revision: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMeta {
    #[serde(default)]
    pub spreadsheet_token: Option<String>,
    #[serde(default)]
    pub properties: SheetProperties,
    #[serde(default)]
    pub sheets: Vec<SheetInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRange {
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRangeData {
    pub value_range: ValueRange,
}

/// What a single `values_append` call reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendReceipt {
    #[serde(default)]
    pub updated_rows: u64,
    #[serde(default)]
    pub updated_cells: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AppendData {
    #[serde(default)]
    pub updates: AppendReceipt,
}

// --- Bitable ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitableApp {
    pub app_token: ObjectToken,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub revision: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BitableAppData {
    pub app: BitableApp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitableTable {
    pub table_id: TableId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub revision: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitableView {
    pub view_id: ViewId,
    #[serde(default)]
    pub view_name: String,
    #[serde(default)]
    pub view_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BatchCreateData {
    #[serde(default)]
    pub records: Vec<BitableRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordData {
    pub record: BitableRecord,
}

// --- IM ---

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageData {
    pub image_key: String,
}
