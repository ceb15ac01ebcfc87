use crate::models::PageMeta;

/// Page cursor owned by list views. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            total: 0,
        }
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn go_to(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
    }

    /// Take `total` from server metadata, when the response carried any.
    pub fn sync(&mut self, meta: Option<&PageMeta>) {
        if let Some(meta) = meta {
            self.total = meta.total;
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_below_first_page() {
        let mut p = Pagination::new(0, 9);
        assert_eq!(p.page, 1);
        p.prev_page();
        assert_eq!(p.page, 1);
        p.next_page();
        p.next_page();
        assert_eq!(p.page, 3);
        p.go_to(0);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn total_pages_from_meta() {
        let mut p = Pagination::new(1, 9);
        assert_eq!(p.total_pages(), 0);
        p.sync(Some(&PageMeta {
            page: 1,
            limit: 9,
            total: 19,
        }));
        assert_eq!(p.total_pages(), 3);
        p.sync(None);
        assert_eq!(p.total, 19);
    }
}
