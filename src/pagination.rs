use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

impl Pagination {
    pub fn new(current_page: u32, per_page: u32, total_count: u64) -> Self {
        Self {
            current_page,
            per_page,
            total_count,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.per_page as u64) as u32
    }

    /// 1-based `(first, last)` item indices shown on the current page.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.total_count == 0 || self.per_page == 0 || self.current_page == 0 {
            return None;
        }
        let per_page = self.per_page as u64;
        let start = (self.current_page as u64 - 1) * per_page + 1;
        if start > self.total_count {
            return None;
        }
        let end = (self.current_page as u64 * per_page).min(self.total_count);
        Some((start, end))
    }

    /// e.g. "11–20 of 25".
    pub fn range_label(&self) -> String {
        match self.item_range() {
            Some((start, end)) => format!("{}\u{2013}{} of {}", start, end, self.total_count),
            None => format!("0 of {}", self.total_count),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Page strip: first page, neighbours of the current page, last page, with
    /// ellipses over the gaps. Empty when there is at most one page.
    pub fn page_items(&self) -> Vec<PageItem> {
        let total = self.total_pages();
        if total <= 1 {
            return Vec::new();
        }
        let current = self.current_page;
        let mut items = vec![PageItem::Page(1)];

        if current > 3 {
            items.push(PageItem::Ellipsis);
        }

        let from = current.saturating_sub(1).max(2);
        let to = (current + 1).min(total - 1);
        for page in from..=to {
            items.push(PageItem::Page(page));
        }

        if current + 2 < total {
            items.push(PageItem::Ellipsis);
        }

        items.push(PageItem::Page(total));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn second_page_of_twenty_five() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.item_range(), Some((11, 20)));
        assert_eq!(p.range_label(), "11–20 of 25");
    }

    #[test]
    fn last_page_is_clamped_to_total() {
        let p = Pagination::new(3, 10, 25);
        assert_eq!(p.range_label(), "21–25 of 25");
        assert!(!p.has_next());
        assert!(p.has_previous());
    }

    #[test]
    fn empty_results() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages(), 0);
        assert_eq!(p.range_label(), "0 of 0");
        assert!(p.page_items().is_empty());
    }

    #[test]
    fn strip_with_ellipses_on_both_sides() {
        let p = Pagination::new(6, 10, 200);
        assert_eq!(
            p.page_items(),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn strip_near_the_edges() {
        assert_eq!(
            Pagination::new(1, 10, 50).page_items(),
            vec![Page(1), Page(2), Ellipsis, Page(5)]
        );
        assert_eq!(
            Pagination::new(5, 10, 50).page_items(),
            vec![Page(1), Ellipsis, Page(4), Page(5)]
        );
        assert_eq!(
            Pagination::new(2, 10, 25).page_items(),
            vec![Page(1), Page(2), Page(3)]
        );
    }
}
