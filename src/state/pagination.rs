//! Pagination cursor and pager window.

use wire::PageMeta;

/// Pages shown before the window collapses with ellipses.
pub const MAX_VISIBLE_PAGES: u64 = 5;
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Where a list slice is in its server-side paging.
///
/// Invariant: `1 <= current_page <= last_page`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    current_page: u64,
    last_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub from: u64,
    pub to: u64,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self { current_page: 1, last_page: 1, per_page: DEFAULT_PER_PAGE, total: 0, from: 0, to: 0 }
    }
}

impl PageCursor {
    /// Cursor from response metadata, filling gaps with defaults and clamping.
    #[must_use]
    pub fn from_meta(meta: &PageMeta) -> Self {
        let last_page = meta.last_page.unwrap_or(1).max(1);
        let current_page = meta.current_page.unwrap_or(1).clamp(1, last_page);
        Self {
            current_page,
            last_page,
            per_page: meta.per_page.unwrap_or(DEFAULT_PER_PAGE),
            total: meta.total.unwrap_or(0),
            from: meta.from.unwrap_or(0),
            to: meta.to.unwrap_or(0),
        }
    }

    /// Cursor for a response without metadata: one page holding `count` records.
    #[must_use]
    pub fn unpaginated(count: u64) -> Self {
        Self { total: count, from: u64::from(count > 0), to: count, ..Self::default() }
    }

    #[must_use]
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    #[must_use]
    pub fn last_page(&self) -> u64 {
        self.last_page
    }

    #[must_use]
    pub fn clamp_page(&self, page: u64) -> u64 {
        page.clamp(1, self.last_page)
    }

    /// Move to `page` (clamped) and return the page actually selected.
    pub fn set_page(&mut self, page: u64) -> u64 {
        self.current_page = self.clamp_page(page);
        self.current_page
    }

    /// Displayed record range, e.g. "showing 11 to 20 of 57".
    #[must_use]
    pub fn range(&self) -> (u64, u64) {
        (self.from, self.to)
    }

    pub(crate) fn record_created(&mut self) {
        self.total += 1;
    }

    pub(crate) fn record_deleted(&mut self) {
        self.total = self.total.saturating_sub(1);
    }

    /// Pager items for the current position.
    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.current_page, self.last_page)
    }
}

/// One entry of a pager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

/// Pager items for `current` of `last` pages.
///
/// Up to five pages are listed in full. Past that: `1 2 3 … last` near the
/// start, `1 … last-2 last-1 last` near the end, `1 … p-1 p p+1 … last`
/// in between.
#[must_use]
pub fn page_window(current: u64, last: u64) -> Vec<PageItem> {
    let last = last.max(1);
    let current = current.clamp(1, last);
    if last <= MAX_VISIBLE_PAGES {
        return (1..=last).map(PageItem::Page).collect();
    }
    let mut items = Vec::with_capacity(7);
    if current <= 3 {
        items.extend((1..=3).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(last));
    } else if current >= last - 2 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((last - 2..=last).map(PageItem::Page));
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((current - 1..=current + 1).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(last));
    }
    items
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
