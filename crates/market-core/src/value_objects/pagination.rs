//! Page/limit pagination used by listing and search endpoints

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: u32 = 24;
pub const MAX_PAGE_LIMIT: u32 = 50;

/// A clamped 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Clamp page to at least 1 and limit to `1..=50`, default limit 24
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        let limit = limit
            .unwrap_or(i64::from(DEFAULT_PAGE_LIMIT))
            .clamp(1, i64::from(MAX_PAGE_LIMIT)) as u32;
        Self { page, limit }
    }

    /// First page with the given limit
    pub fn first(limit: u32) -> Self {
        Self::new(Some(1), Some(i64::from(limit)))
    }

    /// Zero-based row offset
    #[inline]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Inclusive zero-based index of the last row on this page
    #[inline]
    pub fn last_index(&self) -> i64 {
        self.offset() + i64::from(self.limit) - 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PageRequest::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 24);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.last_index(), 23);
    }

    #[test]
    fn test_clamping() {
        let p = PageRequest::new(Some(0), Some(500));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 50);

        let p = PageRequest::new(Some(-3), Some(0));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn test_offset() {
        let p = PageRequest::new(Some(3), Some(10));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.last_index(), 29);
    }
}
