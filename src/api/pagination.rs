// src/api/pagination.rs
//! Cursor pagination for Notion list endpoints.

use crate::error::AppError;
use serde::Deserialize;

/// One page of a Notion list response.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Fetches pages until the server reports no more, concatenating results.
///
/// `fetch_page` receives the cursor of the next page (`None` for the first).
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, AppError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = fetch_page(cursor).await?;
        pages_fetched += 1;
        items.extend(response.results);

        match response.next_cursor {
            Some(next) if response.has_more => cursor = Some(next),
            _ => break,
        }
    }

    log::debug!(
        "Fetched {} item(s) across {} page(s)",
        items.len(),
        pages_fetched
    );
    Ok(items)
}
