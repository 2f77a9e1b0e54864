//! Observable list state

use finanzas_core::{PageQuery, SortOrder};

/// What a list page shows
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<E> {
    /// Loaded items, newest creations first
    pub items: Vec<E>,
    /// Server-side total for the current filter
    pub total_records: u64,
    /// A request is in flight
    pub loading: bool,
    /// Last failure, as shown to the user
    pub error: Option<String>,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub page_size: u32,
    /// Active filter
    pub search_term: Option<String>,
    /// Active sort column
    pub sort_column: Option<String>,
    /// Active sort direction
    pub sort_order: Option<SortOrder>,
}

impl<E> ListState<E> {
    /// Empty state with `page_size` items per page
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_records: 0,
            loading: false,
            error: None,
            page: 1,
            page_size: page_size.max(1),
            search_term: None,
            sort_column: None,
            sort_order: None,
        }
    }

    /// Query reproducing the current page
    #[must_use]
    pub fn query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
            search_term: self.search_term.clone(),
            sort_column: self.sort_column.clone(),
            sort_order: self.sort_order,
        }
    }

    /// Remember `query` as the current page
    pub(crate) fn apply_query(&mut self, query: &PageQuery) {
        self.page = query.page;
        self.page_size = query.page_size;
        self.search_term.clone_from(&query.search_term);
        self.sort_column.clone_from(&query.sort_column);
        self.sort_order = query.sort_order;
    }

    /// Pages needed for `total_records`
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_records.div_ceil(u64::from(self.page_size.max(1)))
    }
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self::new(10)
    }
}
