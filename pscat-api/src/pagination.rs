//! Pagination for catalog listings

use serde::Serialize;

/// Page size when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest page a client may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sanitized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed page number
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Clamp raw query values into range
    ///
    /// # Examples
    /// ```
    /// use pscat_api::pagination::PageRequest;
    ///
    /// let p = PageRequest::new(Some(3), Some(500));
    /// assert_eq!(p.page, 3);
    /// assert_eq!(p.limit, 100);
    /// assert_eq!(p.offset(), 200);
    /// ```
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Offset for SQL LIMIT/OFFSET
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Metadata for a page drawn from `total` matching rows
    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages: (total + self.limit - 1) / self.limit,
        }
    }
}

/// Pagination block returned with list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}
