//! Pagination over the alert collection
//!
//! The collection is replaced wholesale on every fetch, so the state only
//! stores the cursor and the page size. Every bound is derived from the
//! collection length passed in by the caller.

use std::ops::Range;

/// Rows per page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Current page (1-indexed) and fixed page size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    page_size: usize,
}

/// Derived state of the previous/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: usize,
    pub total_pages: usize,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationControls {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages.max(1))
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// Create a pagination state positioned on the first page
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(len / page_size)`, zero for an empty collection
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Highest reachable page; an empty collection still has one (empty) page
    pub fn last_page(&self, len: usize) -> usize {
        self.total_pages(len).max(1)
    }

    /// Move by `delta` pages, clamped into `[1, last_page(len)]`
    pub fn change_page(&mut self, delta: isize, len: usize) -> usize {
        let last = self.last_page(len) as isize;
        let target = (self.current_page as isize).saturating_add(delta).clamp(1, last);
        self.current_page = target as usize;
        self.current_page
    }

    pub fn next(&mut self, len: usize) -> usize {
        self.change_page(1, len)
    }

    pub fn previous(&mut self, len: usize) -> usize {
        self.change_page(-1, len)
    }

    /// Pull the cursor back into range after the collection shrank.
    /// Returns true if the page changed.
    pub fn clamp(&mut self, len: usize) -> bool {
        let before = self.current_page;
        self.change_page(0, len);
        before != self.current_page
    }

    /// Index range of the current page. An out-of-range page is empty.
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = (self.current_page - 1).saturating_mul(self.page_size);
        if start >= len {
            return len..len;
        }
        start..start.saturating_add(self.page_size).min(len)
    }

    /// Slice of `items` on the current page
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }

    pub fn controls(&self, len: usize) -> PaginationControls {
        let total_pages = self.total_pages(len);
        PaginationControls {
            current_page: self.current_page,
            total_pages,
            previous_enabled: self.current_page > 1,
            next_enabled: self.current_page < total_pages,
        }
    }
}
