//! Page metadata derived from an item count and a page size.
//!
//! [`Paginator`] only stores the three inputs (current page, page size, total
//! items) plus the ellipsis window width. Everything else is recomputed on
//! every call, so there is nothing to keep in sync.

use std::fmt;

pub const DEFAULT_MAX_VISIBLE_PAGES: u64 = 5;

/// One entry of the page-number strip shown under a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    /// Non-clickable gap marker.
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(page) => write!(f, "{}", page),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Snapshot of every derived pagination value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub total_items: u64,
    /// Zero-based index of the first item on the current page.
    pub start_index: u64,
    /// Zero-based index of the last item on the current page, `None` when there are no items.
    pub end_index: Option<u64>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// `max(1, ceil(total_items / page_size))`
pub fn total_pages(total_items: u64, page_size: u64) -> u64 {
    total_items.div_ceil(page_size.max(1)).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: u64,
    page_size: u64,
    total_items: u64,
    max_visible_pages: u64,
}

impl Paginator {
    pub fn new(total_items: u64, page_size: u64) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items,
            max_visible_pages: DEFAULT_MAX_VISIBLE_PAGES,
        }
    }

    pub fn with_initial_page(mut self, page: u64) -> Self {
        self.go_to_page(page);
        self
    }

    pub fn with_max_visible_pages(mut self, max_visible_pages: u64) -> Self {
        self.max_visible_pages = max_visible_pages.max(1);
        self
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_items, self.page_size)
    }

    pub fn state(&self) -> PaginationState {
        let total_pages = self.total_pages();
        let start_index = (self.current_page - 1) * self.page_size;
        let end_index = self
            .total_items
            .checked_sub(1)
            .map(|last| (start_index + self.page_size - 1).min(last));

        PaginationState {
            current_page: self.current_page,
            total_pages,
            page_size: self.page_size,
            total_items: self.total_items,
            start_index,
            end_index,
            has_next_page: self.current_page < total_pages,
            has_previous_page: self.current_page > 1,
        }
    }

    /// Page strip with ellipsis markers once the page count exceeds the window.
    pub fn page_items(&self) -> Vec<PageItem> {
        let total_pages = self.total_pages();
        let current = self.current_page;

        if total_pages <= self.max_visible_pages {
            return (1..=total_pages).map(PageItem::Page).collect();
        }

        let mut items = vec![PageItem::Page(1)];
        if current > 3 {
            items.push(PageItem::Ellipsis);
        }

        let start = current.saturating_sub(1).max(2);
        let end = (current + 1).min(total_pages - 1);
        items.extend(
            (start..=end)
                .filter(|&page| page != 1 && page != total_pages)
                .map(PageItem::Page),
        );

        if current + 2 < total_pages {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total_pages));
        items
    }

    /// Clamps `page` into `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: u64) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn go_to_next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn go_to_previous_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn go_to_first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn go_to_last_page(&mut self) {
        self.current_page = self.total_pages();
    }

    /// Always returns to page 1; the previous position is not preserved.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Updates the item count after a refetch, pulling the current page back
    /// inside the new page range if the list shrank.
    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// Items `start_index..=end_index` of `items`.
    pub fn page_data<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let state = self.state();
        let Some(end_index) = state.end_index else {
            return &[];
        };

        let start = usize::try_from(state.start_index).unwrap_or(usize::MAX);
        let end = usize::try_from(end_index)
            .map(|end| end.saturating_add(1))
            .unwrap_or(usize::MAX)
            .min(items.len());

        if start >= end {
            return &[];
        }
        &items[start..end]
    }
}
