use super::leaf::Leaf;

/// One page of the filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub items: Vec<Leaf>,
    /// 1-based index of this page.
    pub page_index: usize,
    /// `ceil(filtered / page_size)`; zero when nothing matches.
    pub total_pages: usize,
    /// Number of records that matched the search text.
    pub total_matches: usize,
}

impl QueryPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages
    }
}
