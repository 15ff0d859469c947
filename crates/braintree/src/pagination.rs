//! Lazily fetched, page-at-a-time result sequences.

use std::collections::VecDeque;

use futures::stream::{self, Stream, TryStreamExt};

use crate::error::BraintreeError;

/// One page of search results as reported by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    pub total_items: u64,
    pub page_size: u64,
    pub items: Vec<T>,
}

impl<T> PaginatedResult<T> {
    /// Whether `page` (1-based) is the last page worth requesting.
    fn is_last(&self, page: u32) -> bool {
        self.items.is_empty()
            || self.page_size == 0
            || u64::from(page).saturating_mul(self.page_size) >= self.total_items
    }
}

/// Source of pages for a [`PaginatedCollection`].
pub trait PageFetcher: Send + Sync {
    type Item: Send;

    /// Fetch the given 1-based page.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = Result<PaginatedResult<Self::Item>, BraintreeError>> + Send;
}

/// Finite sequence of items fetched one page at a time as the caller
/// advances. Dropping the stream stops fetching; nothing is held open
/// between pages.
#[derive(Debug, Clone)]
pub struct PaginatedCollection<F> {
    fetcher: F,
}

struct Cursor<T> {
    next_page: u32,
    buffered: VecDeque<T>,
    exhausted: bool,
}

impl<F: PageFetcher> PaginatedCollection<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch a single page directly.
    pub async fn page(&self, page: u32) -> Result<PaginatedResult<F::Item>, BraintreeError> {
        self.fetcher.fetch_page(page).await
    }

    /// Stream every item, starting from page 1. The stream ends after the
    /// last page or after the first error.
    pub fn items(&self) -> impl Stream<Item = Result<F::Item, BraintreeError>> + Send + '_ {
        let cursor = Cursor {
            next_page: 1,
            buffered: VecDeque::new(),
            exhausted: false,
        };

        stream::unfold(cursor, move |mut cursor| async move {
            loop {
                if let Some(item) = cursor.buffered.pop_front() {
                    return Some((Ok(item), cursor));
                }
                if cursor.exhausted {
                    return None;
                }

                let page = cursor.next_page;
                match self.fetcher.fetch_page(page).await {
                    Ok(result) => {
                        tracing::debug!(
                            page,
                            total_items = result.total_items,
                            page_size = result.page_size,
                            "fetched result page"
                        );
                        cursor.exhausted = result.is_last(page);
                        cursor.next_page = page.saturating_add(1);
                        cursor.buffered.extend(result.items);
                    }
                    Err(e) => {
                        cursor.exhausted = true;
                        return Some((Err(e), cursor));
                    }
                }
            }
        })
    }

    /// Drain every page into a vector.
    pub async fn collect_all(&self) -> Result<Vec<F::Item>, BraintreeError> {
        self.items().try_collect().await
    }
}
