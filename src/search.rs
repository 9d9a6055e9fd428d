use std::time::{Duration, Instant};

use crate::models::{MediaItem, MediaType, PaginatedPage};
use crate::query::{dedupe_by_media_key, FetchTicket, InfiniteQuery, QueryStatus};

/// Quiet period before a raw input value becomes the committed query
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(400);

/// Grace period after clearing the input before navigating back
pub const BACK_NAV_GRACE: Duration = Duration::from_millis(400);

/// Observable state of the search view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Empty committed query; no list shown
    Idle,
    /// Non-empty committed query, first page in flight
    Pending,
    /// Zero or more results rendered
    Ready,
}

/// Side effects requested by the controller, applied by the hosting view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// Sync the committed query into the URL, replacing the current history
    /// entry so back-navigation does not step through keystrokes.
    /// `None` clears the query parameter.
    ReplaceUrl(Option<String>),
    /// Start a new fetch sequence at page 1 for the committed query
    BeginSearch { query: String },
    /// Return to the previously visited view
    NavigateBack,
}

/// Debounced search state machine
///
/// Time is explicit: keystrokes and polls carry an `Instant`, and all
/// transitions are pure functions of input events and time. Update rule is
/// one-directional: raw input -> (after the quiet period) committed query ->
/// URL + fetch sequence.
#[derive(Debug, Clone)]
pub struct SearchController {
    input: String,
    committed: String,
    debounce_deadline: Option<Instant>,
    back_deadline: Option<Instant>,
    results: InfiniteQuery<MediaItem>,
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            committed: String::new(),
            debounce_deadline: None,
            back_deadline: None,
            results: InfiniteQuery::disabled(),
        }
    }

    /// Restores a controller from a URL query parameter (deep link into the
    /// search view).
    pub fn from_query(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Self::new();
        }
        Self {
            input: trimmed.to_string(),
            committed: trimmed.to_string(),
            debounce_deadline: None,
            back_deadline: None,
            results: InfiniteQuery::new(),
        }
    }

    /// Raw input value as typed, before debouncing
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Committed query driving the URL and the fetch sequence
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn state(&self) -> SearchState {
        if self.committed.is_empty() {
            SearchState::Idle
        } else if self.results.pages().is_empty()
            && !matches!(self.results.status(), QueryStatus::Error(_))
        {
            SearchState::Pending
        } else {
            SearchState::Ready
        }
    }

    /// Records a keystroke at `now`
    ///
    /// Re-arms the debounce window; typing also cancels a pending
    /// back-navigation. Clearing the input arms the back-navigation grace
    /// timer instead.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        self.debounce_deadline = Some(now + DEBOUNCE_WINDOW);
        self.back_deadline = None;

        if self.input.trim().is_empty() && !self.committed.is_empty() {
            self.back_deadline = Some(now + BACK_NAV_GRACE);
        }
    }

    /// Fires transitions whose deadlines have passed, returning the effects
    /// the hosting view must apply
    pub fn poll(&mut self, now: Instant) -> Vec<SearchEffect> {
        let mut effects = Vec::new();

        if let Some(deadline) = self.debounce_deadline {
            if now >= deadline {
                self.debounce_deadline = None;
                let trimmed = self.input.trim().to_string();
                if trimmed != self.committed {
                    self.committed = trimmed.clone();
                    if trimmed.is_empty() {
                        self.results = InfiniteQuery::disabled();
                        effects.push(SearchEffect::ReplaceUrl(None));
                    } else {
                        self.results.reset();
                        self.results.enable();
                        effects.push(SearchEffect::ReplaceUrl(Some(trimmed.clone())));
                        effects.push(SearchEffect::BeginSearch { query: trimmed });
                    }
                }
            }
        }

        if let Some(deadline) = self.back_deadline {
            if now >= deadline {
                self.back_deadline = None;
                if self.input.trim().is_empty() {
                    effects.push(SearchEffect::NavigateBack);
                }
            }
        }

        effects
    }

    /// Leaving the search view clears the input and drops the result list
    pub fn on_leave_search_view(&mut self) {
        self.input.clear();
        self.committed.clear();
        self.debounce_deadline = None;
        self.back_deadline = None;
        self.results = InfiniteQuery::disabled();
    }

    /// Claims the next result-page fetch for the committed query
    pub fn begin_next_fetch(&mut self) -> Option<FetchTicket> {
        if self.committed.is_empty() {
            return None;
        }
        self.results.begin_next_fetch()
    }

    pub fn on_page(&mut self, ticket: FetchTicket, page: PaginatedPage<MediaItem>) {
        self.results.complete_fetch(ticket, page);
    }

    pub fn on_error(&mut self, ticket: FetchTicket, message: String) {
        self.results.fail_fetch(ticket, message);
    }

    pub fn has_next_page(&self) -> bool {
        !self.committed.is_empty() && self.results.has_next_page()
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.results.is_fetching_next_page()
    }

    /// Accumulated results shaped for presentation
    pub fn visible_results(&self) -> Vec<MediaItem> {
        filter_results(self.results.items())
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

/// Shapes raw multi-search rows for presentation
///
/// Keeps only movie and TV rows that carry a poster image, then removes
/// cross-type duplicates by (media_type, id).
pub fn filter_results(items: Vec<MediaItem>) -> Vec<MediaItem> {
    let kept = items
        .into_iter()
        .filter(|item| {
            matches!(item.media_type, Some(MediaType::Movie) | Some(MediaType::Tv))
                && item.poster_path.is_some()
        })
        .collect();
    dedupe_by_media_key(kept)
}
