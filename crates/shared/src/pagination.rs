//! Offset-based pagination parameters shared by list endpoints.

use serde::{Deserialize, Serialize};

/// Sort direction for timestamp-ordered listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Limit/offset window. Unset fields are left out of the query string so the
/// backend applies its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl PageQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// The window immediately after this one, keeping the same limit.
    ///
    /// Returns `None` when no limit is set, since the page size is unknown.
    pub fn next_page(&self) -> Option<Self> {
        let limit = self.limit?;
        Some(Self {
            limit: Some(limit),
            offset: Some(self.offset.unwrap_or(0).saturating_add(limit)),
        })
    }
}

/// Returns true when `offset + returned` has not yet reached `total`.
pub fn has_more(offset: u64, returned: usize, total: u64) -> bool {
    offset.saturating_add(returned as u64) < total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&SortOrder::Asc).unwrap(), "\"ASC\"");
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"DESC\"");
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.as_str(), "ASC");
    }

    #[test]
    fn test_page_query_omits_unset_fields() {
        let json = serde_json::to_value(PageQuery::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));

        let json = serde_json::to_value(PageQuery {
            limit: Some(25),
            offset: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "limit": 25 }));
    }

    #[test]
    fn test_next_page() {
        let page = PageQuery::new(50, 100);
        assert_eq!(page.next_page(), Some(PageQuery::new(50, 150)));

        let first = PageQuery {
            limit: Some(20),
            offset: None,
        };
        assert_eq!(first.next_page(), Some(PageQuery::new(20, 20)));

        assert_eq!(PageQuery::default().next_page(), None);
    }

    #[test]
    fn test_has_more() {
        assert!(has_more(0, 50, 120));
        assert!(!has_more(100, 20, 120));
        assert!(!has_more(0, 0, 0));
    }
}
