//! Offset/limit windowing shared by every paginated listing.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PAGE_SIZE;
use crate::error::{CoreError, Result};

/// Number of pages needed to show `total` rows, `page_size` at a time.
#[must_use]
pub fn total_pages(total: u64, page_size: NonZeroU32) -> u64 {
    total.div_ceil(u64::from(page_size.get()))
}

/// Offset of the first row of 1-based `page`. Page 0 is treated as page 1.
#[must_use]
pub fn offset_for_page(page: u64, page_size: NonZeroU32) -> u64 {
    page.saturating_sub(1).saturating_mul(u64::from(page_size.get()))
}

/// Validates a page size against what the backend accepts.
///
/// # Errors
/// Returns `CoreError::InvalidPageSize` for 0 or anything above `MAX_PAGE_SIZE`.
pub fn page_size(raw: u64) -> Result<NonZeroU32> {
    u32::try_from(raw)
        .ok()
        .filter(|n| *n <= MAX_PAGE_SIZE)
        .and_then(NonZeroU32::new)
        .ok_or(CoreError::InvalidPageSize(raw))
}

/// Window requested from a listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub offset: u64,
    pub limit: NonZeroU32,
}

impl PageQuery {
    /// Window covering 1-based `page`.
    #[must_use]
    pub fn for_page(page: u64, page_size: NonZeroU32) -> Self {
        Self { offset: offset_for_page(page, page_size), limit: page_size }
    }

    /// 1-based page number this window starts on.
    #[must_use]
    pub fn page_number(&self) -> u64 {
        self.offset / u64::from(self.limit.get()) + 1
    }
}

/// How an endpoint spells its window parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingStyle {
    /// `offset=<n>&limit=<n>` (logs, analyses).
    #[default]
    OffsetLimit,
    /// `page=<n>&page_size=<n>` (messages).
    PageNumber,
}

impl PagingStyle {
    /// Query pairs describing `query` in this style.
    #[must_use]
    pub fn query_pairs(self, query: &PageQuery) -> Vec<(&'static str, String)> {
        match self {
            Self::OffsetLimit => vec![
                ("offset", query.offset.to_string()),
                ("limit", query.limit.to_string()),
            ],
            Self::PageNumber => vec![
                ("page", query.page_number().to_string()),
                ("page_size", query.limit.to_string()),
            ],
        }
    }
}

/// One window of rows as returned by a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    /// Rows in the window.
    pub items: Vec<T>,
    /// Rows matching the filter across all windows.
    pub total: u64,
}

impl<T> Listing<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// A rendered window plus the position it was fetched at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: u64,
    pub page_size: NonZeroU32,
    pub total_count: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn from_listing(listing: Listing<T>, query: PageQuery) -> Self {
        Self {
            items: listing.items,
            offset: query.offset,
            page_size: query.limit,
            total_count: listing.total,
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count, self.page_size)
    }

    /// 1-based page number; never below 1, even for an empty result.
    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.offset / u64::from(self.page_size.get()) + 1
    }

    /// The filter matched nothing at all.
    #[must_use]
    pub const fn no_results(&self) -> bool {
        self.total_count == 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current_page() > 1
    }

    /// Row number shown next to `index` within this page (1-based, global).
    #[must_use]
    pub fn row_number(&self, index: usize) -> u64 {
        self.offset.saturating_add(index as u64).saturating_add(1)
    }
}
