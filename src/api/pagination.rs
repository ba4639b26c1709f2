//! Page-window parsing shared by the resource list endpoints.
//!
//! Two conventions coexist on purpose:
//!
//! - [`Pagination`] — `page`/`limit` query parameters, used by the admin UI
//!   routes. When neither parameter is present the endpoint returns the full
//!   result set, which older consumers still rely on.
//! - [`OffsetPagination`] — raw `limit`/`offset`, kept for the legacy
//!   `/api/external` endpoints. Always applied (external reads are capped).

use axum::http::{HeaderMap, HeaderValue};
use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

const DEFAULT_EXTERNAL_LIMIT: i64 = 100;

/// Raw query parameters. Kept as strings so garbage input falls back to
/// defaults instead of failing extraction with a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A normalized page window: 1-based page, limit clamped to `[1, 500]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Parse `page`/`limit` from the query. `None` when neither parameter is
    /// present: callers must then skip pagination entirely.
    pub fn from_query(query: &PageQuery) -> Option<Self> {
        if query.page.is_none() && query.limit.is_none() {
            return None;
        }

        let page = query
            .page
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = query
            .limit
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        Some(Self { page, limit })
    }

    /// First row offset of the window. Saturates instead of overflowing so
    /// absurd page numbers stay valid (empty) windows.
    pub fn from(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Last row offset of the window (inclusive).
    pub fn to(&self) -> i64 {
        self.from().saturating_add(self.limit - 1)
    }

    /// Response metadata headers. `X-Total-Count`/`X-Total-Pages` only appear
    /// when the data layer produced an exact count.
    pub fn headers(&self, total_count: Option<i64>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        insert_numeric(&mut headers, "x-page", self.page);
        insert_numeric(&mut headers, "x-limit", self.limit);

        if let Some(total) = total_count {
            let total_pages = (total + self.limit - 1) / self.limit;
            insert_numeric(&mut headers, "x-total-count", total);
            insert_numeric(&mut headers, "x-total-pages", total_pages);
        }

        headers
    }
}

/// Raw query parameters for the legacy external endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct OffsetQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Legacy `limit`/`offset` window. Unlike [`Pagination`] this always applies;
/// the external endpoints never return unbounded result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPagination {
    pub limit: i64,
    pub offset: i64,
}

impl OffsetPagination {
    pub fn from_query(query: &OffsetQuery) -> Self {
        let limit = query
            .limit
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_EXTERNAL_LIMIT)
            .clamp(1, MAX_LIMIT);
        let offset = query
            .offset
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0)
            .max(0);

        Self { limit, offset }
    }
}

fn insert_numeric(headers: &mut HeaderMap, name: &'static str, value: i64) {
    if let Ok(v) = HeaderValue::from_str(&value.to_string()) {
        headers.insert(name, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn absent_parameters_mean_no_pagination() {
        assert_eq!(Pagination::from_query(&query(None, None)), None);
    }

    #[test]
    fn computes_inclusive_window() {
        let p = Pagination::from_query(&query(Some("2"), Some("10"))).unwrap();
        assert_eq!(p.page, 2);
        assert_eq!(p.limit, 10);
        assert_eq!(p.from(), 10);
        assert_eq!(p.to(), 19);
    }

    #[test]
    fn oversized_limit_is_clamped() {
        let p = Pagination::from_query(&query(None, Some("9999"))).unwrap();
        assert_eq!(p.limit, MAX_LIMIT);
    }

    #[test]
    fn garbage_input_falls_back_to_defaults() {
        let p = Pagination::from_query(&query(Some("abc"), Some("xyz"))).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn zero_and_negative_values_are_floored() {
        let p = Pagination::from_query(&query(Some("0"), Some("-3"))).unwrap();
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let p = Pagination::from_query(&query(Some("9223372036854775807"), Some("500"))).unwrap();
        assert_eq!(p.from(), i64::MAX);
        assert_eq!(p.to(), i64::MAX);
        assert!(p.from() >= 0, "offset must stay non-negative");
    }

    #[test]
    fn headers_without_total() {
        let p = Pagination { page: 3, limit: 25 };
        let headers = p.headers(None);
        assert_eq!(headers.get("x-page").unwrap(), "3");
        assert_eq!(headers.get("x-limit").unwrap(), "25");
        assert!(headers.get("x-total-count").is_none());
        assert!(headers.get("x-total-pages").is_none());
    }

    #[test]
    fn headers_with_total_include_page_count() {
        let p = Pagination { page: 1, limit: 10 };
        let headers = p.headers(Some(101));
        assert_eq!(headers.get("x-total-count").unwrap(), "101");
        assert_eq!(headers.get("x-total-pages").unwrap(), "11");
    }

    #[test]
    fn offset_pagination_defaults_and_caps() {
        let p = OffsetPagination::from_query(&OffsetQuery::default());
        assert_eq!(p.limit, 100);
        assert_eq!(p.offset, 0);

        let p = OffsetPagination::from_query(&OffsetQuery {
            limit: Some("9999".into()),
            offset: Some("-5".into()),
        });
        assert_eq!(p.limit, MAX_LIMIT);
        assert_eq!(p.offset, 0);
    }
}
