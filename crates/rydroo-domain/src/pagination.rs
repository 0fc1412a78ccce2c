//! Pagination parameters for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size when `limit` is absent or non-positive.
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound applied to `limit`.
pub const MAX_LIMIT: u32 = 100;

/// Pagination parameters shared across list endpoints.
///
/// - `limit`: 1–100, default 10
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u32,
    pub page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 1,
        }
    }
}

impl PageRequest {
    /// Build from raw query values. Absent or non-positive values fall back to the defaults.
    pub fn from_query(limit: Option<i64>, page: Option<i64>) -> Self {
        let limit = match limit {
            Some(v) if v > 0 => u32::try_from(v).unwrap_or(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        let page = match page {
            Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
            _ => 1,
        };
        Self { limit, page }.clamped()
    }

    /// Clamp `limit` to 1–100 and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_LIMIT),
            page: self.page.max(1),
        }
    }

    /// Number of rows to skip.
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}
