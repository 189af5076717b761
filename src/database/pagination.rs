use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Normalized page window used by every list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        let page = if page <= 0 { DEFAULT_PAGE } else { page };
        let limit = match limit {
            l if l <= 0 => DEFAULT_LIMIT,
            l if l > MAX_LIMIT => MAX_LIMIT,
            l => l,
        };
        Self { page, limit }
    }

    /// Saturates for absurd page numbers; the window is then simply empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// `?page=&limit=` query string. Unparseable values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        let parse = |v: Option<String>| v.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0);
        Pagination::new(parse(q.page), parse(q.limit))
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bounds() {
        assert_eq!(Pagination::new(0, 0), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(-3, 500), Pagination { page: 1, limit: 100 });
        assert_eq!(Pagination::new(3, 20).offset(), 40);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = Pagination::new(i64::MAX, 10);
        assert_eq!(p.offset(), i64::MAX);

        let q: Pagination = PageQuery {
            page: Some(i64::MAX.to_string()),
            limit: Some("10".into()),
        }
        .into();
        assert_eq!(q.offset(), i64::MAX);
    }

    #[test]
    fn query_with_garbage_uses_defaults() {
        let p: Pagination = PageQuery {
            page: Some("abc".into()),
            limit: Some("25".into()),
        }
        .into();
        assert_eq!(p, Pagination { page: 1, limit: 25 });
    }
}
