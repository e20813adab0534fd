/// One page of an in-memory result list.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` into the requested page. Missing or unparseable page
    /// numbers select the first page; numbers past the end select the last.
    pub fn from_items(items: Vec<T>, requested: Option<&str>, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_count = items.len();
        let total_pages = total_count.div_ceil(per_page).max(1);
        let page = requested
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .map_or(1, |p| p.min(total_pages));

        let items = items
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Page { items, page, per_page, total_count, total_pages }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous_page(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> usize {
        (self.page + 1).min(self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_page() {
        let page = Page::from_items((1..=25).collect::<Vec<_>>(), Some("2"), 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn invalid_page_falls_back_to_first() {
        for requested in [None, Some("abc"), Some("0"), Some("-3")] {
            let page = Page::from_items((1..=25).collect::<Vec<_>>(), requested, 10);
            assert_eq!(page.page, 1, "{requested:?}");
            assert!(!page.has_previous());
        }
    }

    #[test]
    fn past_the_end_gives_last_page() {
        let page = Page::from_items((1..=25).collect::<Vec<_>>(), Some("99"), 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert!(!page.has_next());
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let page: Page<i32> = Page::from_items(Vec::new(), Some("4"), 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
