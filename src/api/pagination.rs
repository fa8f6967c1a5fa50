// src/api/pagination.rs
//! Cursor-driven pagination.
//!
//! The loop stops only when the server says there is nothing more. A page
//! that claims more data but carries no cursor is a protocol violation and
//! fails the whole read instead of stopping early or spinning.

use crate::error::AppError;
use serde::Deserialize;

/// One page of a listing as the platform returns it.
///
/// `items` is omitted by the server when the listing is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Option<Vec<T>>,
    pub total: Option<u64>,
    #[serde(default)]
    pub has_more: bool,
    pub page_token: Option<String>,
}

impl<T> Page<T> {
    /// The continuation cursor; an empty string counts as absent.
    pub fn cursor(&self) -> Option<&str> {
        self.page_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Everything collected by a completed pagination loop.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    /// `total` as reported by the last page, when the endpoint reports one
    pub total_reported: Option<u64>,
}

/// Fetches every page, concatenating items in fetch order.
///
/// `fetch_fn` receives the cursor for the next page (`None` for the first
/// page). Any error aborts the loop and discards what was collected.
pub async fn fetch_all_pages<T, F, Fut>(
    endpoint: &str,
    mut fetch_fn: F,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<Page<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut has_more = true;
    let mut pages_fetched = 0u32;
    let mut total_reported = None;

    while has_more {
        let page = fetch_fn(cursor.take()).await?;
        pages_fetched += 1;

        has_more = page.has_more;
        total_reported = page.total.or(total_reported);
        let next = page.cursor().map(str::to_string);
        all_items.extend(page.items.unwrap_or_default());

        if has_more {
            match next {
                Some(token) => cursor = Some(token),
                None => {
                    return Err(AppError::PaginationProtocol {
                        endpoint: endpoint.to_string(),
                        pages_fetched,
                    })
                }
            }
        }
    }

    log::debug!(
        "{}: {} items over {} pages",
        endpoint,
        all_items.len(),
        pages_fetched
    );

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
        total_reported,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn page(items: Option<Vec<u32>>, has_more: bool, token: Option<&str>) -> Page<u32> {
        Page {
            total: items.as_ref().map(|i| i.len() as u64),
            items,
            has_more,
            page_token: token.map(str::to_string),
        }
    }

    async fn run(pages: Vec<Page<u32>>) -> (Result<PaginationResult<u32>, AppError>, Vec<Option<String>>) {
        let mut pages: VecDeque<_> = pages.into();
        let mut cursors = Vec::new();
        let result = fetch_all_pages("/items", |cursor| {
            cursors.push(cursor);
            let next = pages.pop_front();
            async move { next.ok_or_else(|| AppError::Rendering("no more pages".to_string())) }
        })
        .await;
        (result, cursors)
    }

    #[tokio::test]
    async fn test_concatenates_pages_and_threads_cursors() {
        let (result, cursors) = run(vec![
            page(Some(vec![1, 2]), true, Some("c1")),
            page(Some(vec![3]), true, Some("c2")),
            page(Some(vec![4]), false, None),
        ])
        .await;

        let result = result.unwrap();
        assert_eq!(result.items, vec![1, 2, 3, 4]);
        assert_eq!(result.pages_fetched, 3);
        assert_eq!(
            cursors,
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_absent_items_count_as_empty() {
        let (result, _) = run(vec![page(None, false, None)]).await;
        assert!(result.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_more_without_cursor_is_a_protocol_error() {
        let (result, cursors) = run(vec![
            page(Some(vec![1]), true, Some("c1")),
            page(Some(vec![2]), true, Some("")),
        ])
        .await;

        assert!(matches!(
            result,
            Err(AppError::PaginationProtocol { pages_fetched: 2, .. })
        ));
        assert_eq!(cursors.len(), 2);
    }

    #[tokio::test]
    async fn test_trailing_cursor_on_last_page_is_ignored() {
        let (result, cursors) = run(vec![page(Some(vec![9]), false, Some("stale"))]).await;
        assert_eq!(result.unwrap().items, vec![9]);
        assert_eq!(cursors, vec![None]);
    }

    #[test]
    fn test_page_deserializes_without_items() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"total": 0, "has_more": false, "page_token": null}"#).unwrap();
        assert!(page.items.is_none());
        assert_eq!(page.total, Some(0));
        assert!(page.cursor().is_none());
    }

    #[test]
    fn test_page_of_records_deserializes() {
        use crate::types::BitableRecord;

        let page: Page<BitableRecord> = serde_json::from_str(
            r#"{"has_more": true, "page_token": "p2", "items": [{"record_id": "recA", "fields": {"team": "ops"}}]}"#,
        )
        .unwrap();
        assert_eq!(page.items.as_ref().unwrap().len(), 1);
        assert_eq!(page.cursor(), Some("p2"));

        let empty: Page<BitableRecord> = serde_json::from_str(r#"{"has_more": false}"#).unwrap();
        assert!(empty.items.is_none());
        assert!(empty.page_token.is_none());
    }
}
