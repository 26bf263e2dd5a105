//! Cursor pagination

use crate::error::{Result, SyncError};
use crate::notion::types::ListResponse;
use serde_json::Value;
use std::future::Future;

/// Upper bound on pages followed for one listing
pub const MAX_PAGES: usize = 10_000;

/// Follow `next_cursor` until `has_more` is false, concatenating results.
///
/// `fetch` receives the cursor of the page to load (`None` for the first).
pub async fn fetch_all<F, Fut>(mut fetch: F) -> Result<Vec<Value>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ListResponse>>,
{
    let mut results = Vec::new();
    let mut cursor = None;

    for _ in 0..MAX_PAGES {
        let page = fetch(cursor.take()).await?;
        results.extend(page.results);

        match (page.has_more, page.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            (true, None) => {
                return Err(SyncError::malformed("has_more set without next_cursor"));
            },
            (false, _) => return Ok(results),
        }
    }

    Err(SyncError::malformed(format!(
        "pagination did not terminate after {} pages",
        MAX_PAGES
    )))
}
