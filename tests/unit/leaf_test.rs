//! Unit tests for the Leaf record type and its wire format.

use rstest::rstest;
use serde_json::json;

use cassandra_leaves::types::errors::LeafError;
use cassandra_leaves::types::leaf::{join_tags, parse_tags, FieldValue, Leaf, LeafFields};

fn backend_record() -> serde_json::Value {
    json!({
        "id": 311,
        "created_at": 1718000000000i64,
        "content": "<p>Body</p>",
        "domain_name": "blog.rust-lang.org",
        "http_status": "200",
        "language": "en",
        "last_sourced_from_wallabag": "2024-06-10",
        "mimetype": "text/html",
        "preview_picture": null,
        "published_by": "Rust Team",
        "tags": ["rust", "release"],
        "title": "Announcing Rust",
        "updated_at": 1718000001000i64,
        "url": "https://blog.rust-lang.org/",
        "user_email": "reader@example.com",
        "user_id": 4,
        "user_name": "reader",
        "wallabag_created_at": "2024-06-09T10:00:00Z",
        "wallabag_is_archived": true,
        "wallabag_updated_at": "2024-06-09T11:00:00Z",
        "some_future_field": "ignored"
    })
}

#[test]
fn test_deserializes_backend_record() {
    let leaf: Leaf = serde_json::from_value(backend_record()).unwrap();

    assert_eq!(leaf.id, 311);
    assert_eq!(leaf.created_at, Some(FieldValue::Number(1718000000000)));
    assert_eq!(leaf.fields.title, "Announcing Rust");
    assert_eq!(leaf.fields.tags, vec!["rust", "release"]);
    assert_eq!(leaf.fields.preview_picture, None);
    assert_eq!(leaf.fields.http_status, Some(FieldValue::Text("200".to_string())));
    assert_eq!(leaf.fields.user_id, Some(FieldValue::Number(4)));
    assert!(leaf.fields.wallabag_is_archived);
}

#[test]
fn test_nulls_and_missing_fields_take_defaults() {
    let leaf: Leaf = serde_json::from_value(json!({
        "id": 1,
        "title": null,
        "tags": null,
        "wallabag_is_archived": null
    }))
    .unwrap();

    assert_eq!(leaf.fields.title, "");
    assert!(leaf.fields.tags.is_empty());
    assert!(!leaf.fields.wallabag_is_archived);
    assert_eq!(leaf.fields.domain_name, "");
}

#[test]
fn test_missing_id_is_rejected() {
    let result: Result<Leaf, _> = serde_json::from_value(json!({ "title": "No id" }));
    assert!(result.is_err());
}

#[test]
fn test_fields_serialize_without_id() {
    let leaf: Leaf = serde_json::from_value(backend_record()).unwrap();

    let body = serde_json::to_value(LeafFields::from_leaf(&leaf)).unwrap();

    assert!(body.get("id").is_none());
    assert!(body.get("created_at").is_none());
    assert_eq!(body["domain_name"], "blog.rust-lang.org");
}

#[test]
fn test_apply_preserves_identity() {
    let leaf: Leaf = serde_json::from_value(backend_record()).unwrap();
    let mut fields = LeafFields::from_leaf(&leaf);
    fields.title = "Edited".to_string();

    let updated = leaf.apply(&fields);

    assert_eq!(updated.id, leaf.id);
    assert_eq!(updated.created_at, leaf.created_at);
    assert_eq!(updated.fields.title, "Edited");
}

#[rstest]
#[case("Title", "example.com", true)]
#[case("", "example.com", false)]
#[case("Title", "  ", false)]
#[case(" ", "", false)]
fn test_validate_requires_title_and_domain(
    #[case] title: &str,
    #[case] domain: &str,
    #[case] valid: bool,
) {
    let fields = LeafFields {
        title: title.to_string(),
        domain_name: domain.to_string(),
        ..LeafFields::default()
    };
    assert_eq!(fields.validate().is_ok(), valid);
    if !valid {
        assert!(matches!(fields.validate(), Err(LeafError::Validation(_))));
    }
}

#[rstest]
#[case("rust, async ,  tokio", vec!["rust", "async", "tokio"])]
#[case("single", vec!["single"])]
#[case(" , ,", vec![])]
#[case("", vec![])]
fn test_parse_tags(#[case] input: &str, #[case] expected: Vec<&str>) {
    assert_eq!(parse_tags(input), expected);
}

#[test]
fn test_join_tags() {
    assert_eq!(join_tags(&["a".to_string(), "b".to_string()]), "a, b");
    assert_eq!(join_tags(&[]), "");
}

#[test]
fn test_field_value_as_text() {
    assert_eq!(FieldValue::Number(200).as_text(), "200");
    assert_eq!(FieldValue::Text("2024-01-01".to_string()).as_text(), "2024-01-01");
}
