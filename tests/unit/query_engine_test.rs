//! Unit tests for the Query Layer: title search and pagination.

#[path = "../common/mod.rs"]
mod common;

use rstest::rstest;

use cassandra_leaves::managers::query_engine::{filter_leaves, query, DEFAULT_PAGE_SIZE};

use common::{leaf, leaves};

#[test]
fn test_search_is_case_insensitive_on_title() {
    let collection = vec![
        leaf(1, "Alpha Guide"),
        leaf(2, "Beta Notes"),
        leaf(3, "alpha tips"),
    ];

    let page = query(&collection, "alpha", 1, DEFAULT_PAGE_SIZE);

    let titles: Vec<&str> = page.items.iter().map(|l| l.fields.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha Guide", "alpha tips"]);
    assert_eq!(page.total_matches, 2);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn test_search_ignores_fields_other_than_title() {
    let mut record = leaf(1, "Unrelated");
    record.fields.domain_name = "alpha.com".to_string();
    record.fields.content = "alpha".to_string();

    assert!(filter_leaves(&[record], "alpha").is_empty());
}

#[test]
fn test_absent_search_text_yields_zero_pages() {
    let collection = leaves(1, 40);

    let page = query(&collection, "zzz-not-here", 1, DEFAULT_PAGE_SIZE);

    assert!(page.is_empty());
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_matches, 0);
}

#[test]
fn test_seventeen_records_make_two_pages() {
    let collection = leaves(1, 17);

    let first = query(&collection, "", 1, 16);
    let second = query(&collection, "", 2, 16);

    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 16);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].id, 17);
    assert!(first.has_next());
    assert!(!first.has_previous());
    assert!(second.has_previous());
    assert!(!second.has_next());
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(100)]
fn test_out_of_range_page_is_empty(#[case] page_index: usize) {
    let collection = leaves(1, 20);

    let page = query(&collection, "", page_index, 16);

    assert!(page.is_empty());
    assert_eq!(page.total_pages, 2);
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(16, 1)]
#[case(17, 2)]
#[case(32, 2)]
#[case(33, 3)]
fn test_total_pages(#[case] size: usize, #[case] expected: usize) {
    let collection = leaves(1, size);
    assert_eq!(query(&collection, "", 1, 16).total_pages, expected);
}

#[test]
fn test_filtering_preserves_collection_order() {
    let collection = vec![leaf(5, "Rust b"), leaf(2, "Go"), leaf(9, "rust a")];

    let ids: Vec<u64> = filter_leaves(&collection, "RUST").iter().map(|l| l.id).collect();

    assert_eq!(ids, vec![5, 9]);
}
