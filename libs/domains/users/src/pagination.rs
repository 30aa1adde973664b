//! Page/limit resolution and LIKE pattern helpers for list queries.

use core_config::pagination::PaginatorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("limit must be a positive integer")]
    InvalidLimit(i64),
}

/// Largest LIMIT/OFFSET PostgreSQL can bind (a signed BIGINT).
pub const MAX_SQL_BOUND: u64 = i64::MAX as u64;

/// Raw `page`/`limit` as received from the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    /// Parse query string values. Anything that is not an integer counts as absent.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let number = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(number(page), number(limit))
    }

    /// Resolve against the configured bounds.
    ///
    /// - limit absent or zero: `default_limit`
    /// - limit negative: [`PaginationError::InvalidLimit`]
    /// - limit above `max_limit` (or [`MAX_SQL_BOUND`]): clamped
    /// - page absent or below 1: page 1
    pub fn resolve(&self, config: &PaginatorConfig) -> Result<Pagination, PaginationError> {
        let limit = match self.limit {
            None | Some(0) => config.default_limit,
            Some(limit) if limit < 0 => return Err(PaginationError::InvalidLimit(limit)),
            Some(limit) => limit.unsigned_abs(),
        };
        let limit = config
            .max_limit
            .map_or(limit, |max| limit.min(max))
            .clamp(1, MAX_SQL_BOUND);

        let page = match self.page {
            Some(page) if page >= 1 => page.unsigned_abs(),
            _ => 1,
        };

        Ok(Pagination { page, limit })
    }
}

/// A validated page position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    pub page: u64,
    /// Always at least 1
    pub limit: u64,
}

impl Pagination {
    /// `(page - 1) * limit`, capped at [`MAX_SQL_BOUND`].
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_SQL_BOUND)
    }

    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            offset: self.offset(),
            total,
            total_pages: total.div_ceil(self.limit),
        }
    }
}

/// Position of a list response within the filtered population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
    /// Number of records matching the filters
    pub total: u64,
    pub total_pages: u64,
}

/// Escape LIKE metacharacters with a backslash.
pub fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

/// Lowercased, escaped `%value%` pattern for a contains match.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", like_escape(&value.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginatorConfig {
        PaginatorConfig::new(10)
    }

    #[test]
    fn test_absent_or_zero_limit_uses_default() {
        let absent = PageRequest::new(None, None).resolve(&config()).unwrap();
        let zero = PageRequest::new(Some(1), Some(0)).resolve(&config()).unwrap();

        assert_eq!(absent, Pagination { page: 1, limit: 10 });
        assert_eq!(zero, absent);
    }

    #[test]
    fn test_non_numeric_values_count_as_absent() {
        let request = PageRequest::parse(Some("two"), Some("ten"));
        assert_eq!(request, PageRequest::default());
        assert_eq!(
            request.resolve(&config()).unwrap(),
            Pagination { page: 1, limit: 10 }
        );
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let err = PageRequest::new(None, Some(-5))
            .resolve(&config())
            .unwrap_err();

        assert_eq!(err, PaginationError::InvalidLimit(-5));
        assert_eq!(err.to_string(), "limit must be a positive integer");
    }

    #[test]
    fn test_page_zero_or_negative_is_page_one() {
        for page in [None, Some(0), Some(-3)] {
            let pagination = PageRequest::new(page, Some(5)).resolve(&config()).unwrap();
            assert_eq!(pagination.page, 1);
            assert_eq!(pagination.offset(), 0);
        }
    }

    #[test]
    fn test_offset_is_page_minus_one_times_limit() {
        let pagination = PageRequest::parse(Some("3"), Some("25"))
            .resolve(&config())
            .unwrap();

        assert_eq!(pagination.offset(), 50);
    }

    #[test]
    fn test_offset_never_exceeds_bigint() {
        let pagination = PageRequest::parse(Some("1000000000000000000"), Some("10"))
            .resolve(&config())
            .unwrap();
        assert_eq!(pagination.offset(), MAX_SQL_BOUND);

        let pagination = Pagination {
            page: u64::MAX,
            limit: u64::MAX,
        };
        assert_eq!(pagination.offset(), MAX_SQL_BOUND);
    }

    #[test]
    fn test_huge_limit_fits_bigint() {
        let pagination = PageRequest::new(Some(3), Some(i64::MAX))
            .resolve(&config())
            .unwrap();
        assert_eq!(pagination.limit, MAX_SQL_BOUND);
        assert_eq!(pagination.offset(), MAX_SQL_BOUND);

        let config = PaginatorConfig::new(u64::MAX);
        let pagination = PageRequest::default().resolve(&config).unwrap();
        assert_eq!(pagination.limit, MAX_SQL_BOUND);
    }

    #[test]
    fn test_meta_for_huge_page_reports_real_totals() {
        let meta = PageRequest::parse(Some("1000000000000000000"), Some("10"))
            .resolve(&config())
            .unwrap()
            .meta(42);

        assert_eq!(meta.page, 1_000_000_000_000_000_000);
        assert_eq!(meta.limit, 10);
        assert_eq!(meta.offset, MAX_SQL_BOUND);
        assert_eq!(meta.total, 42);
        assert_eq!(meta.total_pages, 5);
    }

    #[test]
    fn test_limit_is_clamped_to_max() {
        let config = PaginatorConfig::new(10).with_max_limit(50);
        let pagination = PageRequest::new(None, Some(500)).resolve(&config).unwrap();

        assert_eq!(pagination.limit, 50);
    }

    #[test]
    fn test_meta_total_pages() {
        let pagination = Pagination { page: 1, limit: 10 };

        assert_eq!(pagination.meta(0).total_pages, 0);
        assert_eq!(pagination.meta(1).total_pages, 1);
        assert_eq!(pagination.meta(10).total_pages, 1);
        assert_eq!(pagination.meta(11).total_pages, 2);
    }

    #[test]
    fn test_meta_beyond_last_page_still_reports_totals() {
        let meta = Pagination { page: 9, limit: 10 }.meta(15);

        assert_eq!(meta.page, 9);
        assert_eq!(meta.offset, 80);
        assert_eq!(meta.total, 15);
        assert_eq!(meta.total_pages, 2);
    }

    #[test]
    fn test_contains_pattern_lowercases_and_escapes() {
        assert_eq!(contains_pattern("Ann"), "%ann%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
