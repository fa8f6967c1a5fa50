// src/api/wiki.rs
//! Wiki spaces and nodes.

use super::pagination::{fetch_all_pages, Page};
use super::responses::{NodeData, WikiNode, WikiSpace};
use super::types::ApiRequest;
use super::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::constants::FEISHU_API_PAGE_SIZE;
use crate::error::AppError;
use crate::types::{NodeToken, SpaceId};

pub const WIKI_SPACES_ENDPOINT: &str = "/wiki/v2/spaces";
pub const WIKI_NODE_ENDPOINT: &str = "/wiki/v2/spaces/get_node";

impl<T: FeishuTransport> FeishuConnector<T> {
    /// Lists every wiki space visible to the app.
    pub async fn list_wiki_spaces(&self) -> Result<Vec<WikiSpace>, AppError> {
        self.list_all(WIKI_SPACES_ENDPOINT).await
    }

    /// Lists the top-level nodes of a space.
    pub async fn list_wiki_nodes(&self, space: &SpaceId) -> Result<Vec<WikiNode>, AppError> {
        let endpoint = format!("{}/{}/nodes", WIKI_SPACES_ENDPOINT, space);
        self.list_all(&endpoint).await
    }

    /// Fetches the detail of one node, including the object it wraps.
    pub async fn get_node(&self, node: &NodeToken) -> Result<WikiNode, AppError> {
        let request = ApiRequest::get(WIKI_NODE_ENDPOINT).query("token", node);
        let data: NodeData = self.call(request).await?;
        Ok(data.node)
    }

    /// Drains a paginated GET listing.
    pub(crate) async fn list_all<R>(&self, endpoint: &str) -> Result<Vec<R>, AppError>
    where
        R: serde::de::DeserializeOwned,
    {
        let result = fetch_all_pages(endpoint, |cursor| {
            let mut request = ApiRequest::get(endpoint).query("page_size", FEISHU_API_PAGE_SIZE);
            if let Some(cursor) = cursor {
                request = request.query("page_token", cursor);
            }
            self.call::<Page<R>>(request)
        })
        .await?;
        Ok(result.items)
    }
}
