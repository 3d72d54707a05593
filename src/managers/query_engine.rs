//! Query Layer: title search and pagination over the in-memory collection.
//!
//! Filtering is recomputed from the full collection on every call.

use crate::types::leaf::Leaf;
use crate::types::query::QueryPage;

pub const DEFAULT_PAGE_SIZE: usize = 16;

/// Case-insensitive substring match against the title only.
pub fn matches_title(leaf: &Leaf, needle_lower: &str) -> bool {
    needle_lower.is_empty() || leaf.fields.title.to_lowercase().contains(needle_lower)
}

/// Returns every record whose title contains `search`, in collection order.
pub fn filter_leaves<'a>(leaves: &'a [Leaf], search: &str) -> Vec<&'a Leaf> {
    let needle = search.to_lowercase();
    leaves.iter().filter(|leaf| matches_title(leaf, &needle)).collect()
}

/// `ceil(count / page_size)`. A zero page size yields zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Produces one page of the filtered collection.
///
/// `page_index` is 1-based and is not clamped: an index outside
/// `1..=total_pages` yields an empty page.
pub fn query(leaves: &[Leaf], search: &str, page_index: usize, page_size: usize) -> QueryPage {
    let filtered = filter_leaves(leaves, search);
    let total_matches = filtered.len();
    let total_pages = total_pages(total_matches, page_size);

    let items = if page_index == 0 || page_size == 0 {
        Vec::new()
    } else {
        filtered
            .into_iter()
            .skip((page_index - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    };

    QueryPage {
        items,
        page_index,
        total_pages,
        total_matches,
    }
}
