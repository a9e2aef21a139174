//! Offset pagination shared by every listing endpoint.

use crate::{model::api::PageDto, server::util::parse};

/// Largest page size a client may request.
pub const MAX_LIMIT: u64 = 100;

/// Requested page of a listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Builds a page request from raw query values.
    ///
    /// Missing or unparsable values fall back to page 1 and `default_limit`. The limit is
    /// clamped to `1..=MAX_LIMIT` and the page is capped so the offset fits a SQL integer.
    ///
    /// # Arguments
    /// - `page` - Raw `page` query value
    /// - `limit` - Raw `limit` query value
    /// - `default_limit` - Page size used when the client sent none
    pub fn from_query(page: Option<String>, limit: Option<String>, default_limit: u64) -> Self {
        let limit = parse::number(limit)
            .unwrap_or(default_limit)
            .clamp(1, MAX_LIMIT);
        let last_page = i64::MAX as u64 / limit + 1;
        let page = parse::number(page).unwrap_or(1).clamp(1, last_page);

        Self { page, limit }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of results with the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts the page into the paginated response envelope.
    ///
    /// # Arguments
    /// - `message` - Optional message for the envelope
    /// - `convert` - Conversion applied to every item
    pub fn into_dto<U>(self, message: Option<&str>, convert: impl FnMut(T) -> U) -> PageDto<U> {
        let total_pages = self.total_pages();

        PageDto {
            message: message.map(str::to_string),
            data: self.items.into_iter().map(convert).collect(),
            total_docs: self.total,
            total_pages,
            current_page: self.page,
        }
    }
}
