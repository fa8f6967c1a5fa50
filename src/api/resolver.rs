// src/api/resolver.rs
//! Node to table resolution.
//!
//! A wiki node wraps either a bitable app directly or a spreadsheet whose
//! sub-sheets may embed bitable blocks. Embedded blocks expose a token of
//! the form `{app}_{table}`; the `{app}` half is the bitable app token.

use super::responses::SheetMeta;
use super::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::error::AppError;
use crate::observer::ConnectorEvent;
use crate::types::{NodeToken, ObjectKind, ObjectToken, TableId};

/// Finds the bitable app embedded in a sheet for `table`.
pub fn find_embedded_app(meta: &SheetMeta, table: &TableId) -> Option<ObjectToken> {
    meta.sheets
        .iter()
        .filter_map(|sheet| sheet.block_info.as_ref())
        .filter_map(|info| info.app_and_table())
        .filter(|(_, embedded_table)| *embedded_table == table.as_str())
        .find_map(|(app, _)| ObjectToken::parse(app).ok())
}

impl<T: FeishuTransport> FeishuConnector<T> {
    /// Resolves the bitable app token holding `table` behind a wiki node.
    ///
    /// Not cached: every call re-reads the node.
    pub async fn resolve_table(
        &self,
        node: &NodeToken,
        table: &TableId,
    ) -> Result<ObjectToken, AppError> {
        let detail = self.get_node(node).await?;

        let app_token = match &detail.obj_type {
            ObjectKind::Bitable => detail.obj_token.clone(),
            ObjectKind::Sheet => {
                let meta = self.get_sheet_meta(&detail.obj_token).await?;
                find_embedded_app(&meta, table).ok_or_else(|| AppError::Resolution {
                    node: node.to_string(),
                    table: table.to_string(),
                })?
            }
            other => {
                return Err(AppError::UnsupportedNodeKind {
                    node: node.to_string(),
                    kind: other.to_string(),
                })
            }
        };

        self.emit(ConnectorEvent::TableResolved {
            node: node.to_string(),
            kind: detail.obj_type.to_string(),
            object_token: app_token.to_string(),
            table: table.to_string(),
        });
        Ok(app_token)
    }

    /// The object token behind a node, whatever its kind.
    pub async fn resolve_object(&self, node: &NodeToken) -> Result<ObjectToken, AppError> {
        Ok(self.get_node(node).await?.obj_token)
    }
}
