//! Pagination / search / sort parameters for list endpoints

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Query-string value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters of a paginated list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Free-text filter
    pub search_term: Option<String>,
    /// Column to sort by
    pub sort_column: Option<String>,
    /// Sort direction
    pub sort_order: Option<SortOrder>,
}

impl PageQuery {
    /// Page `page` (clamped to ≥ 1) of `page_size` items
    #[inline]
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            search_term: None,
            sort_column: None,
            sort_order: None,
        }
    }

    /// With search term
    #[inline]
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// With sort column and direction
    #[inline]
    #[must_use]
    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    /// Same filters, different page
    #[inline]
    #[must_use]
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// Query-string pairs. Blank terms and columns are omitted.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(term) = self.search_term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            pairs.push(("searchTerm".to_string(), term.to_string()));
        }
        if let Some(column) = self.sort_column.as_deref().filter(|c| !c.trim().is_empty()) {
            pairs.push(("sortColumn".to_string(), column.to_string()));
            pairs.push((
                "sortOrder".to_string(),
                self.sort_order.unwrap_or_default().as_str().to_string(),
            ));
        }
        pairs
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn default_query() {
        assert_eq!(
            PageQuery::default().to_pairs(),
            vec![pair("page", "1"), pair("pageSize", "10")]
        );
    }

    #[test]
    fn full_query() {
        let q = PageQuery::new(3, 20)
            .with_search("  luz ")
            .with_sort("importe", SortOrder::Desc);
        assert_eq!(
            q.to_pairs(),
            vec![
                pair("page", "3"),
                pair("pageSize", "20"),
                pair("searchTerm", "luz"),
                pair("sortColumn", "importe"),
                pair("sortOrder", "desc"),
            ]
        );
    }

    #[test]
    fn blank_search_is_omitted() {
        let q = PageQuery::default().with_search("   ");
        assert!(!q.to_pairs().iter().any(|(k, _)| k == "searchTerm"));
    }

    #[test]
    fn at_page_keeps_filters() {
        let q = PageQuery::new(1, 5).with_search("gas").at_page(4);
        assert_eq!(q.page, 4);
        assert_eq!(q.search_term.as_deref(), Some("gas"));
    }

    proptest! {
        #[test]
        fn page_is_never_zero(page in 0u32..1000, size in 0u32..500) {
            let q = PageQuery::new(page, size);
            prop_assert!(q.page >= 1);
            prop_assert!(q.page_size >= 1);
            prop_assert_eq!(&q.to_pairs()[0].1, &q.page.to_string());
        }
    }
}
