use std::{collections::VecDeque, future::Future};

use crate::{error::ServiceError, types::Page};

/// Cursor-following iterator over a paged collection.
///
/// `fetch` receives the cursor of the page to load (`None` for the first one)
/// and returns that page. Items are yielded in page order; the walk ends when
/// a page carries no `next` cursor. A fetch error is returned once and leaves
/// the paginator exhausted, so nothing is ever yielded twice. Call
/// [`restart`](Self::restart) to walk again from the first page.
pub struct Paginator<T, F> {
    fetch: F,
    cursor: Option<String>,
    buffer: VecDeque<T>,
    exhausted: bool,
    pages_fetched: u32,
}

impl<T, F, Fut> Paginator<T, F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ServiceError>>,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            cursor: None,
            buffer: VecDeque::new(),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Returns the next item, loading pages as needed.
    ///
    /// - `Ok(Some(item))` - next item in the sequence
    /// - `Ok(None)` - no more items
    /// - `Err(...)` - the page fetch failed
    pub async fn next(&mut self) -> Result<Option<T>, ServiceError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.exhausted {
                return Ok(None);
            }

            let cursor = self.cursor.take();
            let page = match (self.fetch)(cursor.clone()).await {
                Ok(page) => page,
                Err(e) => {
                    self.exhausted = true;
                    return Err(e);
                }
            };
            self.pages_fetched += 1;

            match page.next {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    log::warn!("page cursor did not advance, stopping after page {}", self.pages_fetched);
                    self.exhausted = true;
                }
                Some(next) => self.cursor = Some(next),
                None => self.exhausted = true,
            }

            self.buffer.extend(page.items);
        }
    }

    /// Drains every remaining item.
    pub async fn collect_all(&mut self) -> Result<Vec<T>, ServiceError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Rewinds to the first page, discarding buffered items.
    pub fn restart(&mut self) {
        self.cursor = None;
        self.buffer.clear();
        self.exhausted = false;
        self.pages_fetched = 0;
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.buffer.is_empty()
    }
}
