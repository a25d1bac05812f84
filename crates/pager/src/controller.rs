//! Paginated, filtered list controller.
//!
//! Owns the page position for one listing and mediates between a
//! [`ListSource`] and a [`PageRenderer`]:
//!
//! - every fetch is tagged with a sequence number; only the latest may render
//! - issuing a fetch aborts the one still in flight
//! - navigation commits the new position only once its page has loaded, so a
//!   failed request leaves position and screen untouched

use std::num::NonZeroU32;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chatdash_core::{Filter, ListSource, Page, PageQuery, offset_for_page, total_pages};
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};

use crate::error::LoadError;
use crate::renderer::PageRenderer;

/// Snapshot of a controller's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    /// 1-based; stays 1 when nothing matched.
    pub current_page: u64,
    pub offset: u64,
    pub page_size: NonZeroU32,
    pub total_count: u64,
    pub total_pages: u64,
    /// A page has loaded since construction or the last filter change.
    pub has_loaded: bool,
}

struct InFlight {
    seq: u64,
    abort: AbortHandle,
}

struct ControllerState {
    filter: Filter,
    current_page: u64,
    total_count: u64,
    has_loaded: bool,
    latest_seq: u64,
    in_flight: Option<InFlight>,
}

impl ControllerState {
    /// Invalidates whatever is in flight; its response will be discarded.
    fn supersede(&mut self) -> u64 {
        self.latest_seq = self.latest_seq.saturating_add(1);
        if let Some(previous) = self.in_flight.take() {
            tracing::debug!(seq = previous.seq, "aborting superseded list request");
            previous.abort.abort();
        }
        self.latest_seq
    }

    fn register(&mut self, seq: u64) -> AbortRegistration {
        let (abort, registration) = AbortHandle::new_pair();
        self.in_flight = Some(InFlight { seq, abort });
        registration
    }
}

type LoadResult<S> =
    Result<Page<<S as ListSource>::Item>, LoadError<<S as ListSource>::Error>>;

/// Controller for one paginated listing.
pub struct PaginatedFilteredListController<S, R> {
    source: S,
    renderer: R,
    page_size: NonZeroU32,
    state: Mutex<ControllerState>,
}

impl<S, R> std::fmt::Debug for PaginatedFilteredListController<S, R>
where
    S: ListSource,
    R: PageRenderer<S::Item>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedFilteredListController")
            .field("state", &self.state())
            .field("filter", &self.filter())
            .finish_non_exhaustive()
    }
}

impl<S, R> PaginatedFilteredListController<S, R>
where
    S: ListSource,
    R: PageRenderer<S::Item>,
{
    /// Controller positioned on page 1 with an empty filter. Nothing is fetched yet.
    pub fn new(source: S, renderer: R, page_size: NonZeroU32) -> Self {
        Self {
            source,
            renderer,
            page_size,
            state: Mutex::new(ControllerState {
                filter: Filter::new(),
                current_page: 1,
                total_count: 0,
                has_loaded: false,
                latest_seq: 0,
                in_flight: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub const fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Active filter.
    pub fn filter(&self) -> Filter {
        self.lock().filter.clone()
    }

    /// Current position and totals.
    pub fn state(&self) -> PageState {
        let state = self.lock();
        PageState {
            current_page: state.current_page,
            offset: offset_for_page(state.current_page, self.page_size),
            page_size: self.page_size,
            total_count: state.total_count,
            total_pages: total_pages(state.total_count, self.page_size),
            has_loaded: state.has_loaded,
        }
    }

    /// Replaces the filter and returns to page 1 without fetching.
    ///
    /// Totals from the previous filter are forgotten, so navigation is a
    /// no-op until the next `load`. A request still in flight for the old
    /// filter is aborted.
    pub fn set_filters(&self, filter: Filter) {
        let mut state = self.lock();
        state.supersede();
        state.filter = filter;
        state.current_page = 1;
        state.total_count = 0;
        state.has_loaded = false;
        tracing::debug!(criteria = state.filter.len(), "list filter replaced");
    }

    /// Fetches and renders the current page.
    ///
    /// # Errors
    /// `Source` when the fetch fails (the renderer is told once);
    /// `Superseded`/`Cancelled` when a newer request or `cancel` got in first.
    pub async fn load(&self) -> LoadResult<S> {
        let page = self.lock().current_page;
        self.fetch_page(page).await
    }

    /// Moves one page forward. `Ok(None)` (no fetch) on the last page.
    ///
    /// # Errors
    /// As [`Self::load`]; the position only advances on success.
    pub async fn next_page(&self) -> Result<Option<Page<S::Item>>, LoadError<S::Error>> {
        let target = {
            let state = self.lock();
            if state.current_page >= total_pages(state.total_count, self.page_size) {
                tracing::debug!(page = state.current_page, "already on last page");
                return Ok(None);
            }
            state.current_page.saturating_add(1)
        };
        self.fetch_page(target).await.map(Some)
    }

    /// Moves one page back. `Ok(None)` (no fetch) on page 1.
    ///
    /// # Errors
    /// As [`Self::load`]; the position only moves back on success.
    pub async fn prev_page(&self) -> Result<Option<Page<S::Item>>, LoadError<S::Error>> {
        let target = {
            let state = self.lock();
            if state.current_page <= 1 {
                tracing::debug!("already on first page");
                return Ok(None);
            }
            state.current_page.saturating_sub(1)
        };
        self.fetch_page(target).await.map(Some)
    }

    /// Jumps to 1-based page `n`. Pages outside `1..=total_pages` are
    /// ignored: `Ok(None)`, no fetch, no state change.
    ///
    /// # Errors
    /// As [`Self::load`].
    pub async fn go_to_page(&self, n: u64) -> Result<Option<Page<S::Item>>, LoadError<S::Error>> {
        let pages = {
            let state = self.lock();
            total_pages(state.total_count, self.page_size)
        };
        if n == 0 || n > pages {
            tracing::debug!(requested = n, total_pages = pages, "ignoring out-of-range page");
            return Ok(None);
        }
        self.fetch_page(n).await.map(Some)
    }

    /// Aborts the in-flight request, if any. Its `load` resolves to
    /// `LoadError::Cancelled`; nothing is rendered or reported.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if let Some(in_flight) = state.in_flight.take() {
            tracing::debug!(seq = in_flight.seq, "cancelling list request");
            in_flight.abort.abort();
        }
    }

    /// Fetches `target`. When the reply shows the result set shrank below
    /// `target`, the last page that still exists is fetched under the same
    /// sequence number, so what is rendered always matches the stored position.
    async fn fetch_page(&self, target: u64) -> LoadResult<S> {
        let (seq, filter, mut registration) = {
            let mut state = self.lock();
            let seq = state.supersede();
            let registration = state.register(seq);
            (seq, state.filter.clone(), registration)
        };
        let mut target = target;

        loop {
            let query = PageQuery::for_page(target, self.page_size);
            tracing::debug!(seq, page = target, offset = query.offset, "fetching list page");

            let outcome = Abortable::new(self.source.fetch(&filter, query), registration).await;

            let mut state = self.lock();
            let still_current = state.in_flight.as_ref().is_some_and(|f| f.seq == seq);
            if still_current {
                state.in_flight = None;
            }
            if seq != state.latest_seq {
                tracing::debug!(seq, latest = state.latest_seq, "discarding stale list response");
                return Err(LoadError::Superseded { seq });
            }
            if !still_current {
                return Err(LoadError::Cancelled { seq });
            }

            let listing = match outcome {
                Ok(Ok(listing)) => listing,
                Ok(Err(e)) => {
                    tracing::warn!(seq, page = target, error = %e, "list request failed");
                    self.renderer.show_error(&e);
                    return Err(LoadError::Source(e));
                },
                Err(_aborted) => return Err(LoadError::Cancelled { seq }),
            };

            let last = total_pages(listing.total, self.page_size).max(1);
            if target > last {
                tracing::debug!(seq, page = target, last, "result set shrank below requested page");
                target = last;
                registration = state.register(seq);
                continue;
            }

            let page = Page::from_listing(listing, query);
            state.current_page = target;
            state.total_count = page.total_count;
            state.has_loaded = true;
            tracing::info!(
                seq,
                page = target,
                offset = page.offset,
                total = page.total_count,
                rows = page.items.len(),
                "list page loaded"
            );
            self.renderer.render(&page);
            return Ok(page);
        }
    }
}
