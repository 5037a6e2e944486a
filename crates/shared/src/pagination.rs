//! Fixed-size page pagination.
//!
//! Every list surface in Naebak pages the same way: a 1-based `page`
//! parameter and a per-surface page size (12 for candidates, 20 for users,
//! 10 for news). Statistics are aggregated over the full filtered set
//! before a page is cut, so totals never change as the reader pages.

use serde::{Deserialize, Serialize};

/// Query parameters accepted by paginated endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub offset: i64,
}

/// Upper bound on client-requested page sizes.
pub const MAX_PER_PAGE: i64 = 100;

impl PageQuery {
    /// Resolves the query against a surface default, clamping out-of-range
    /// values rather than rejecting them.
    pub fn resolve(&self, default_per_page: i64) -> PageWindow {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);

        PageWindow {
            page,
            per_page,
            offset: (page - 1) * per_page,
        }
    }
}

/// Pagination metadata returned alongside page data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(window: PageWindow, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + window.per_page - 1) / window.per_page
        };
        Self {
            page: window.page,
            per_page: window.per_page,
            total,
            total_pages,
        }
    }
}

/// A page of results with its pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            data,
            pagination: Pagination::new(window, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let window = PageQuery::default().resolve(12);
        assert_eq!(window, PageWindow { page: 1, per_page: 12, offset: 0 });
    }

    #[test]
    fn test_resolve_offset() {
        let query = PageQuery { page: Some(3), per_page: None };
        let window = query.resolve(12);
        assert_eq!(window.offset, 24);
    }

    #[test]
    fn test_resolve_clamps_page() {
        let query = PageQuery { page: Some(0), per_page: Some(-5) };
        let window = query.resolve(20);
        assert_eq!(window.page, 1);
        assert_eq!(window.per_page, 1);
    }

    #[test]
    fn test_resolve_clamps_per_page_to_max() {
        let query = PageQuery { page: Some(1), per_page: Some(10_000) };
        assert_eq!(query.resolve(20).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let window = PageQuery::default().resolve(12);
        assert_eq!(Pagination::new(window, 25).total_pages, 3);
        assert_eq!(Pagination::new(window, 24).total_pages, 2);
        assert_eq!(Pagination::new(window, 0).total_pages, 0);
    }

    #[test]
    fn test_paginated_serializes_camel_case() {
        let window = PageQuery::default().resolve(10);
        let page = Paginated::new(vec![1, 2, 3], window, 3);
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"perPage\""));
        assert!(json.contains("\"totalPages\""));
    }
}
