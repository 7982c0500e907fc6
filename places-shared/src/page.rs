//! Pagination over the listing query.
//!
//! Pages are 1-indexed with a fixed size of [`PAGE_SIZE`]. A value of `0`
//! in `prev_page` / `next_page` means there is no such page.

use serde::Serialize;
use thiserror::Error;

use crate::record::Record;

/// Number of records on a listing page.
pub const PAGE_SIZE: u64 = 10;

/// Errors produced while validating a requested page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The page parameter is not an integer.
    #[error("Invalid 'page' value: '{0}'")]
    NotANumber(String),

    /// Pages start at 1.
    #[error("Invalid 'page' value: {0} is below the first page")]
    BeforeFirst(i64),

    /// The page lies past the last full page of results.
    #[error("Invalid 'page' value: {page} is past the last page {last_page}")]
    PastLast { page: u64, last_page: u64 },

    /// The page lies beyond the deepest window the index will serve.
    #[error("Invalid 'page' value: {0} is beyond the result window")]
    BeyondWindow(u64),
}

/// Index of the last page for `total` matches: `floor(total / PAGE_SIZE)`.
pub fn last_page(total: u64) -> u64 {
    total / PAGE_SIZE
}

/// A validated, 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    /// Pages whose end offset does not fit in a `u64` are rejected.
    pub fn new(page: i64) -> Result<Self, PageError> {
        if page < 1 {
            return Err(PageError::BeforeFirst(page));
        }
        let page = page as u64;
        if page.checked_mul(PAGE_SIZE).is_none() {
            return Err(PageError::BeyondWindow(page));
        }
        Ok(Self { page })
    }

    /// Parse a raw query-string value.
    pub fn parse(raw: &str) -> Result<Self, PageError> {
        let page: i64 = raw
            .trim()
            .parse()
            .map_err(|_| PageError::NotANumber(raw.to_string()))?;
        Self::new(page)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * PAGE_SIZE
    }
}

/// One page of listing results plus its navigation indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPage {
    pub total: u64,
    pub page: u64,
    pub records: Vec<Record>,
    pub prev_page: u64,
    pub next_page: u64,
    pub last_page: u64,
}

impl QueryPage {
    /// Shape listing output into a page, rejecting pages past the last one.
    pub fn build(request: PageRequest, total: u64, records: Vec<Record>) -> Result<Self, PageError> {
        let page = request.page();
        let last_page = last_page(total);
        if page > last_page {
            return Err(PageError::PastLast { page, last_page });
        }

        let prev_page = if page == 1 { 0 } else { page - 1 };
        let next_page = if page == last_page { 0 } else { page + 1 };

        Ok(Self {
            total,
            page,
            records,
            prev_page,
            next_page,
            last_page,
        })
    }
}
