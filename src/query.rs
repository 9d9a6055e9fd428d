use std::collections::HashSet;

use crate::models::{MediaItem, MediaType, PaginatedPage};

/// Page number to request after `page`, if any more pages exist
pub fn next_page_param(page: u32, total_pages: u32) -> Option<u32> {
    if page < total_pages {
        Some(page + 1)
    } else {
        None
    }
}

/// Removes duplicate rows by raw id, preserving first-occurrence order
///
/// Popularity-ranked feeds legitimately repeat an item on adjacent pages when
/// the ranking shifts between requests.
pub fn dedupe_by_id(items: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id))
        .collect()
}

/// Removes duplicate rows by (media_type, id), preserving first-occurrence
/// order
///
/// Raw ids collide across the movie and TV namespaces, so cross-type feeds
/// must key on the composite identity. Untagged rows count as movies.
pub fn dedupe_by_media_key(items: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut seen: HashSet<(MediaType, u64)> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.media_key()))
        .collect()
}

/// Lifecycle of one query key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    /// Intentionally inactive; issues no fetches. Distinct from `Pending`,
    /// which is waiting on an in-flight first page.
    Disabled,
    /// Enabled with no resolved page yet
    Pending,
    /// At least one page resolved
    Ready,
    /// Last fetch failed; surfaced to the caller, never retried automatically
    Error(String),
}

/// Permission to fetch one page, handed out by `begin_next_fetch`
///
/// Carries the query generation so a response that resolves after the key
/// changed is discarded instead of corrupting the new key's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub page: u32,
    generation: u64,
}

/// Accumulating page list for one query key
///
/// Page fetches are strictly sequential: `begin_next_fetch` hands out the
/// next page number exactly once, and further calls are no-ops until the
/// in-flight fetch is completed or failed.
#[derive(Debug, Clone)]
pub struct InfiniteQuery<T> {
    pages: Vec<PaginatedPage<T>>,
    status: QueryStatus,
    fetching_next: bool,
    generation: u64,
}

impl<T> Default for InfiniteQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InfiniteQuery<T> {
    /// An enabled query with no pages yet
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            status: QueryStatus::Pending,
            fetching_next: false,
            generation: 0,
        }
    }

    /// An inactive query; `begin_next_fetch` returns `None` until enabled
    pub fn disabled() -> Self {
        Self {
            status: QueryStatus::Disabled,
            ..Self::new()
        }
    }

    pub fn status(&self) -> &QueryStatus {
        &self.status
    }

    pub fn is_disabled(&self) -> bool {
        self.status == QueryStatus::Disabled
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.fetching_next
    }

    /// Whether more pages exist, derived from the last fetched page. An
    /// enabled query with no pages still has its first page to fetch.
    pub fn has_next_page(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        match self.pages.last() {
            None => true,
            Some(last) => next_page_param(last.page, last.total_pages).is_some(),
        }
    }

    /// Makes an inactive query eligible to fetch
    pub fn enable(&mut self) {
        if self.status == QueryStatus::Disabled {
            self.status = QueryStatus::Pending;
        }
    }

    /// Switches to a new key: drops accumulated pages and invalidates any
    /// in-flight ticket
    pub fn reset(&mut self) {
        self.pages.clear();
        self.status = QueryStatus::Pending;
        self.fetching_next = false;
        self.generation += 1;
    }

    /// Claims the next page fetch
    ///
    /// Returns `None` while a fetch is in flight, when no next page exists,
    /// or when the query is disabled.
    pub fn begin_next_fetch(&mut self) -> Option<FetchTicket> {
        if self.fetching_next || !self.has_next_page() {
            return None;
        }

        let page = match self.pages.last() {
            None => 1,
            Some(last) => next_page_param(last.page, last.total_pages)?,
        };

        self.fetching_next = true;
        Some(FetchTicket {
            page,
            generation: self.generation,
        })
    }

    /// Records a resolved page
    ///
    /// A ticket issued before a `reset` no longer matches the current
    /// generation; its page is silently discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, page: PaginatedPage<T>) {
        if ticket.generation != self.generation {
            return;
        }
        self.pages.push(page);
        self.fetching_next = false;
        self.status = QueryStatus::Ready;
    }

    /// Records a failed fetch; stale tickets are ignored
    pub fn fail_fetch(&mut self, ticket: FetchTicket, message: String) {
        if ticket.generation != self.generation {
            return;
        }
        self.fetching_next = false;
        self.status = QueryStatus::Error(message);
    }

    pub fn pages(&self) -> &[PaginatedPage<T>] {
        &self.pages
    }
}

impl<T: Clone> InfiniteQuery<T> {
    /// All fetched rows flattened in page order
    pub fn items(&self) -> Vec<T> {
        self.pages
            .iter()
            .flat_map(|page| page.results.iter().cloned())
            .collect()
    }
}
