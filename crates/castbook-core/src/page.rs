//! Fixed-size pagination over a derived list.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Pagination state for a list of `total_items` rows.
///
/// Pages are 1-based. `page` is always kept within `1..=total_pages()`
/// (or exactly 1 when there are no pages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total_items: usize,
}

impl Pagination {
    /// Create pagination on page 1. A zero page size is treated as 1.
    #[must_use]
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_items,
        }
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rows in the whole list.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// `ceil(total_items / page_size)`; zero for an empty list.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Whether any pagination control is meaningful.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.total_items > 0
    }

    /// Whether "previous" would move.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether "next" would move.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Clamp a requested page into range.
    #[must_use]
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    /// Jump to a page, clamping out-of-range requests. Returns the new page.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = self.clamp(page);
        self.page
    }

    /// Move one page forward if possible.
    pub fn next(&mut self) -> usize {
        self.go_to(self.page.saturating_add(1))
    }

    /// Move one page back if possible.
    pub fn prev(&mut self) -> usize {
        self.go_to(self.page.saturating_sub(1))
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Replace the list length, keeping the page in range.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.page = self.clamp(self.page);
    }

    /// Index range of the current page within the full list.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        let start = (self.page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }

    /// The current page's slice of `items`.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        items.get(range).unwrap_or_default()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}
