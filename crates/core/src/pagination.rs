//! Offset pagination math for API endpoints
//!
//! Pages are 1-based. `page_size` is bounded to `[1, MAX_PAGE_SIZE]` by the
//! request handlers; the math here assumes already-validated inputs.

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of items per page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page: Option<i64>,
    pub previous_page: Option<i64>,
}

impl PageMeta {
    /// Build pagination metadata for a 1-based page
    ///
    /// # Arguments
    ///
    /// * `total_count` - Total number of stored items
    /// * `page` - Current page number (1-based)
    /// * `page_size` - Items per page
    pub fn new(total_count: i64, page: i64, page_size: i64) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + page_size - 1) / page_size
        };
        let has_next = page < total_pages;
        let has_previous = page > 1;

        Self {
            current_page: page,
            page_size,
            total_count,
            total_pages,
            has_next,
            has_previous,
            next_page: has_next.then_some(page + 1),
            previous_page: has_previous.then_some(page - 1),
        }
    }

    /// Row offset for this page
    ///
    /// Saturates instead of overflowing so an absurdly large (but otherwise
    /// valid) page number reads as an empty page, not a panic.
    pub fn offset(page: i64, page_size: i64) -> i64 {
        (page - 1).saturating_mul(page_size)
    }
}
