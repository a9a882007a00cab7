//! Cursor pagination engine.
//!
//! Turns a page-fetch callback into a bounded, lazy sequence of item
//! batches. Consumers pull one server page at a time, preserving the
//! server-side ordering within and across pages; [`paginate_cursor`]
//! drains the whole sequence for eager callers.

use std::future::Future;

use tracing::debug;

use crate::error::ClientError;

/// Cursor-based page info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPageInfo {
    /// Whether the server reports another page.
    pub has_next_page: bool,
    /// Opaque continuation token for the next page.
    pub end_cursor: Option<String>,
}

/// Cursor-based page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPage<T> {
    /// Items in the page.
    pub items: Vec<T>,
    /// Pagination info.
    pub page_info: CursorPageInfo,
}

/// Pull-based pagination state over a page-fetch callback.
///
/// The loop is strictly sequential: the cursor for page N+1 is only
/// known after page N resolves, so no two fetches are ever in flight.
/// Stopping iteration is equivalent to cancellation once the current
/// call resolves.
#[derive(Debug)]
pub struct CursorPager<F> {
    fetch_page: F,
    cursor: Option<String>,
    total_fetched: usize,
    max_items: Option<usize>,
    done: bool,
}

impl<F> CursorPager<F> {
    /// Create a pager with an optional cap on total items yielded.
    pub fn new(max_items: Option<usize>, fetch_page: F) -> Self {
        Self {
            fetch_page,
            cursor: None,
            total_fetched: 0,
            max_items,
            // A zero cap yields nothing without a single fetch.
            done: max_items == Some(0),
        }
    }

    /// Items yielded so far across all batches.
    #[must_use]
    pub const fn total_fetched(&self) -> usize {
        self.total_fetched
    }

    /// Returns `true` once the sequence is exhausted.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Fetch the next batch, or `None` once the sequence is exhausted.
    ///
    /// An empty page is always a hard stop, even when the server claims
    /// another page exists; a server pairing `hasNextPage: true` with
    /// zero items would otherwise loop forever. A batch is truncated so
    /// the running total never exceeds the cap.
    pub async fn next_batch<T, Fut>(&mut self) -> Result<Option<Vec<T>>, ClientError>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<CursorPage<T>, ClientError>>,
    {
        if self.done {
            return Ok(None);
        }

        let page = match (self.fetch_page)(self.cursor.clone()).await {
            Ok(page) => page,
            Err(err) => {
                self.done = true;
                return Err(err);
            }
        };

        if page.items.is_empty() {
            self.done = true;
            return Ok(None);
        }

        let mut items = page.items;
        if let Some(max) = self.max_items {
            let remaining = max.saturating_sub(self.total_fetched);
            if items.len() > remaining {
                items.truncate(remaining);
            }
        }
        self.total_fetched += items.len();

        let cap_met = self
            .max_items
            .is_some_and(|max| self.total_fetched >= max);
        self.done = cap_met || !page.page_info.has_next_page;
        if !self.done {
            self.cursor.clone_from(&page.page_info.end_cursor);
            if self.cursor.is_none() {
                self.done = true;
            }
        }

        debug!(
            batch = items.len(),
            total = self.total_fetched,
            done = self.done,
            "fetched page"
        );
        Ok(Some(items))
    }

    /// Drain the remaining batches into one ordered list.
    pub async fn collect<T, Fut>(mut self) -> Result<Vec<T>, ClientError>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<CursorPage<T>, ClientError>>,
    {
        let mut out = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            out.extend(batch);
        }
        Ok(out)
    }
}

/// Paginate a cursor-based API and collect every yielded item.
pub async fn paginate_cursor<T, F, Fut>(
    max_items: Option<usize>,
    fetch_page: F,
) -> Result<Vec<T>, ClientError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<CursorPage<T>, ClientError>>,
{
    CursorPager::new(max_items, fetch_page).collect().await
}
