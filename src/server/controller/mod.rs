//! HTTP and WebSocket handlers.
//!
//! Controllers authenticate the caller, convert request DTOs into parameters, call one
//! service and convert the result back into response DTOs.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::model::page::PageRequest;

pub mod notification;
pub mod project;
pub mod socket;
pub mod stats;
pub mod task;
pub mod user;

/// `page` / `limit` query values. Kept as raw strings so placeholders such as `"null"`
/// fall back to the defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size, clamped to 1..=100.
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn to_request(&self, default_limit: u64) -> PageRequest {
        PageRequest::from_query(self.page.clone(), self.limit.clone(), default_limit)
    }
}
