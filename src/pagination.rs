//! Client-side paging over an already-fetched list.

use serde::Serialize;
use std::ops::RangeInclusive;

/// Most page buttons a list footer shows at once.
pub const MAX_PAGE_BUTTONS: usize = 5;

/// `ceil(len / page_size)`; an empty list has zero pages.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Elements `[(page-1)*size, page*size)` clamped to the slice. Out-of-range
/// pages yield an empty slice.
pub fn page_slice<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Page numbers to render as buttons, centred on `current` where possible.
pub fn page_buttons(current: usize, total: usize) -> RangeInclusive<usize> {
    if total == 0 {
        return 1..=0;
    }
    if total <= MAX_PAGE_BUTTONS || current <= 3 {
        return 1..=total.min(MAX_PAGE_BUTTONS);
    }
    if current >= total - 2 {
        return (total - MAX_PAGE_BUTTONS + 1)..=total;
    }
    (current - 2)..=(current + 2)
}

/// Current page of a list view. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    page_size: usize,
    current: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Move to `page` if it lies in `[1, total_pages]`. Anything else is
    /// ignored and the current page stays put. Returns whether it moved.
    pub fn go_to(&mut self, page: usize, len: usize) -> bool {
        let total = total_pages(len, self.page_size);
        if page >= 1 && page <= total {
            self.current = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self, len: usize) -> bool {
        self.go_to(self.current + 1, len)
    }

    pub fn previous(&mut self, len: usize) -> bool {
        self.go_to(self.current.saturating_sub(1), len)
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page_slice(items, self.page_size, self.current)
    }

    pub fn buttons(&self, len: usize) -> RangeInclusive<usize> {
        page_buttons(self.current, self.total_pages(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_five_records_in_pages_of_twenty() {
        let records: Vec<u32> = (0..45).collect();
        let mut pager = Pager::new(20);

        assert_eq!(pager.total_pages(records.len()), 3);
        assert!(pager.go_to(3, records.len()));
        assert_eq!(pager.slice(&records).len(), 5);
        assert_eq!(pager.slice(&records)[0], 40);

        assert!(!pager.go_to(0, records.len()));
        assert_eq!(pager.current(), 3);
        assert!(!pager.go_to(4, records.len()));
        assert_eq!(pager.current(), 3);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let mut pager = Pager::new(20);
        assert_eq!(pager.total_pages(0), 0);
        assert!(!pager.go_to(1, 0));
        assert_eq!(pager.current(), 1);
        assert!(pager.slice::<u8>(&[]).is_empty());
        assert!(pager.buttons(0).is_empty());
    }

    #[test]
    fn next_and_previous_stop_at_the_edges() {
        let mut pager = Pager::new(10);
        assert!(!pager.previous(25));
        assert!(pager.next(25));
        assert!(pager.next(25));
        assert!(!pager.next(25));
        assert_eq!(pager.current(), 3);
    }

    #[test]
    fn page_slice_out_of_range_is_empty() {
        let items = [1, 2, 3];
        assert!(page_slice(&items, 2, 0).is_empty());
        assert!(page_slice(&items, 2, 3).is_empty());
        assert_eq!(page_slice(&items, 2, 2), &[3]);
    }

    #[test]
    fn button_window_follows_current_page() {
        assert_eq!(page_buttons(2, 4), 1..=4);
        assert_eq!(page_buttons(2, 12), 1..=5);
        assert_eq!(page_buttons(11, 12), 8..=12);
        assert_eq!(page_buttons(10, 12), 8..=12);
        assert_eq!(page_buttons(6, 12), 4..=8);
    }
}
