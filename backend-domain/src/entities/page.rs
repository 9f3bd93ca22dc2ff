// Pagination entity
// Caller-supplied paging is parsed leniently and always clamped

use serde::Deserialize;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Raw `?q=&limit=&offset=` parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    /// Builds the query from raw `key=value` pairs. The first occurrence of
    /// a key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut query.q,
                "limit" => &mut query.limit,
                "offset" => &mut query.offset,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn search_term(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset: offset.max(0),
        }
    }

    pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = parse_or(limit, DEFAULT_PAGE_LIMIT);
        let offset = parse_or(offset, 0);
        Self::new(limit, offset)
    }
}

fn parse_or(raw: Option<&str>, fallback: i64) -> i64 {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_into_range() {
        assert_eq!(PageRequest::new(0, 0).limit, 1);
        assert_eq!(PageRequest::new(-50, 0).limit, 1);
        assert_eq!(PageRequest::new(101, 0).limit, 100);
        assert_eq!(PageRequest::new(i64::MAX, 0).limit, 100);
        assert_eq!(PageRequest::new(42, 0).limit, 42);
    }

    #[test]
    fn negative_offset_becomes_zero() {
        assert_eq!(PageRequest::new(10, -1).offset, 0);
        assert_eq!(PageRequest::new(10, i64::MIN).offset, 0);
        assert_eq!(PageRequest::new(10, 30).offset, 30);
    }

    #[test]
    fn missing_or_garbage_values_use_defaults() {
        assert_eq!(PageRequest::from_raw(None, None), PageRequest::new(20, 0));
        assert_eq!(
            PageRequest::from_raw(Some("abc"), Some("")),
            PageRequest::new(20, 0)
        );
        assert_eq!(
            PageRequest::from_raw(Some(" 5 "), Some("-3")),
            PageRequest::new(5, 0)
        );
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let pairs = [("limit", "2"), ("q", "Steve"), ("limit", "50"), ("sort", "x"), ("q", "Alex")]
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let query = ListQuery::from_pairs(pairs);
        assert_eq!(query.search_term(), Some("Steve"));
        assert_eq!(query.page(), PageRequest::new(2, 0));
        assert!(query.offset.is_none());
    }

    #[test]
    fn search_term_is_trimmed_and_blank_is_none() {
        let query = ListQuery {
            q: Some("  Steve ".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(query.search_term(), Some("Steve"));

        let blank = ListQuery {
            q: Some("   ".to_string()),
            ..ListQuery::default()
        };
        assert_eq!(blank.search_term(), None);
    }
}
