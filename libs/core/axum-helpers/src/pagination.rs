//! Paginated list envelope.
//!
//! Every list endpoint in the system returns the same shape:
//! `{ data, currentPage, totalPage, totalItems }`.

use serde::Serialize;
use utoipa::ToSchema;

/// Default page size for list endpoints.
pub const DEFAULT_ROWS_PER_PAGE: u64 = 10;

/// Upper bound on page size; larger requests are clamped.
pub const MAX_ROWS_PER_PAGE: u64 = 100;

/// Paginated list response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Paginated<T> {
    /// The page of items.
    pub data: Vec<T>,
    /// 1-based page number this response covers.
    #[serde(rename = "currentPage")]
    pub current_page: u64,
    /// Total number of pages for the given page size.
    #[serde(rename = "totalPage")]
    pub total_page: u64,
    /// Total number of matching items across all pages.
    #[serde(rename = "totalItems")]
    pub total_items: u64,
}

impl<T> Paginated<T> {
    /// Build an envelope from a page of items plus the overall totals.
    pub fn new(data: Vec<T>, total_items: u64, page: u64, rows_per_page: u64) -> Self {
        let per_page = rows_per_page.max(1);
        Self {
            data,
            current_page: page.max(1),
            total_page: total_items.div_ceil(per_page),
            total_items,
        }
    }

    /// Map the items of the page, keeping the envelope intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_page: self.total_page,
            total_items: self.total_items,
        }
    }
}

/// Clamp a requested page size into the allowed range.
pub fn clamp_rows_per_page(requested: Option<u64>) -> u64 {
    requested
        .unwrap_or(DEFAULT_ROWS_PER_PAGE)
        .clamp(1, MAX_ROWS_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_page_rounds_up() {
        let page = Paginated::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(page.total_page, 3);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let page: Paginated<i32> = Paginated::new(vec![], 0, 1, 10);
        assert_eq!(page.total_page, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_page_zero_is_normalized() {
        let page: Paginated<i32> = Paginated::new(vec![], 5, 0, 10);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_clamp_rows_per_page() {
        assert_eq!(clamp_rows_per_page(None), DEFAULT_ROWS_PER_PAGE);
        assert_eq!(clamp_rows_per_page(Some(0)), 1);
        assert_eq!(clamp_rows_per_page(Some(500)), MAX_ROWS_PER_PAGE);
        assert_eq!(clamp_rows_per_page(Some(25)), 25);
    }

    #[test]
    fn test_map_keeps_envelope() {
        let page = Paginated::new(vec![1, 2], 2, 1, 10).map(|n| n.to_string());
        assert_eq!(page.data, vec!["1", "2"]);
        assert_eq!(page.total_items, 2);
    }
}
