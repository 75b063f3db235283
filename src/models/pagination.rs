//! Page/limit query parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// `?page=&limit=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    const MAX_LIMIT: i64 = 100;

    /// Member lists are short enough that one page usually covers the gym.
    const DEFAULT_LIMIT: i64 = 100;

    pub fn first(limit: i64) -> Self {
        Self {
            page: Some(1),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.current_page() - 1) * self.limit()
    }

    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of a list plus the totals needed to walk the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let limit = pagination.limit();
        Self {
            items,
            total,
            page: pagination.current_page(),
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_limit() {
        assert_eq!(Pagination::first(500).limit(), 100);
        assert_eq!(Pagination::first(0).limit(), 1);
    }

    #[test]
    fn pagination_offset_calculation() {
        let p = Pagination {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn paged_result_walks_pages() {
        let p = Pagination::first(10);
        let result = PagedResult::new(vec![1, 2, 3], 25, &p);
        assert_eq!(result.total_pages, 3);
        assert!(result.has_next());

        let last = PagedResult::new(vec![4], 25, &Pagination { page: Some(3), limit: Some(10) });
        assert!(!last.has_next());
    }

    #[test]
    fn empty_result_has_no_pages() {
        let result = PagedResult::<u8>::new(vec![], 0, &Pagination::default());
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_next());
    }
}
