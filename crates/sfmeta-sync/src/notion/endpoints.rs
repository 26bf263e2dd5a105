//! API endpoint URL builders
//!
//! `base_url` is the API root, e.g. `https://api.notion.com/v1` or a
//! compatible proxy; a trailing slash is ignored.

/// Results requested per page of a paginated listing
pub const PAGE_SIZE: usize = 100;

fn base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Build search URL
pub fn search_url(base_url: &str) -> String {
    format!("{}/search", base(base_url))
}

/// Build page creation URL
pub fn pages_url(base_url: &str) -> String {
    format!("{}/pages", base(base_url))
}

/// Build page URL (retrieve / update properties)
pub fn page_url(base_url: &str, page_id: &str) -> String {
    format!("{}/pages/{}", base(base_url), page_id)
}

/// Build database creation URL
pub fn databases_url(base_url: &str) -> String {
    format!("{}/databases", base(base_url))
}

/// Build database URL
pub fn database_url(base_url: &str, database_id: &str) -> String {
    format!("{}/databases/{}", base(base_url), database_id)
}

/// Build database query URL
pub fn database_query_url(base_url: &str, database_id: &str) -> String {
    format!("{}/databases/{}/query", base(base_url), database_id)
}

/// Build block children URL, paginated when listing
pub fn block_children_url(base_url: &str, block_id: &str, start_cursor: Option<&str>) -> String {
    let mut url = format!(
        "{}/blocks/{}/children?page_size={}",
        base(base_url),
        block_id,
        PAGE_SIZE
    );

    if let Some(cursor) = start_cursor {
        url.push_str(&format!("&start_cursor={}", cursor));
    }

    url
}

/// Build block children URL for appending
pub fn block_append_url(base_url: &str, block_id: &str) -> String {
    format!("{}/blocks/{}/children", base(base_url), block_id)
}
