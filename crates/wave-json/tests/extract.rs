//! JSON path extraction contract

use serde_json::json;
use wave_json::{JsonExtractor, JsonPathError, DEFAULT_CACHE_CAPACITY};

const STORE: &str = r#"{
    "store": {
        "book": [
            { "title": "Sayings", "price": 8.95, "tags": ["a", "b"] },
            { "title": "Sword", "price": 12.99, "tags": [] },
            { "title": "Moby", "price": 8.99 }
        ],
        "bicycle": { "color": "red", "*": "star" }
    },
    "count": 3
}"#;

#[test]
fn test_child_and_index() {
    let mut extractor = JsonExtractor::new();

    let titles = extractor.extract(STORE, "$.store.book[1].title").unwrap();
    assert_eq!(titles, Some(vec![json!("Sword")]));

    let color = extractor.extract(STORE, r#"$["store"]['bicycle'].color"#).unwrap();
    assert_eq!(color, Some(vec![json!("red")]));
}

#[test]
fn test_wildcard_fans_out() {
    let mut extractor = JsonExtractor::new();

    let prices = extractor.extract(STORE, "$.store.book[*].price").unwrap();
    assert_eq!(prices, Some(vec![json!(8.95), json!(12.99), json!(8.99)]));

    let tags = extractor.extract(STORE, "$.store.book.*.tags.*").unwrap();
    assert_eq!(tags, Some(vec![json!("a"), json!("b")]));
}

#[test]
fn test_wildcard_on_object_is_literal_key() {
    let mut extractor = JsonExtractor::new();
    let value = extractor.extract(STORE, "$.store.bicycle.*").unwrap();
    assert_eq!(value, Some(vec![json!("star")]));
}

#[test]
fn test_root_returns_whole_document() {
    let mut extractor = JsonExtractor::new();
    assert_eq!(extractor.extract("42", "$").unwrap(), Some(vec![json!(42)]));
    assert_eq!(
        extractor.extract(r#"{"a":1}"#, "$").unwrap(),
        Some(vec![json!({ "a": 1 })])
    );
}

#[test]
fn test_not_found_yields_no_values() {
    let mut extractor = JsonExtractor::new();

    for path in [
        "$.missing",
        "$.store.book[7]",
        "$.store.book.x",
        "$.count.deeper",
        "$.store.bicycle[0]",
    ] {
        assert_eq!(extractor.extract(STORE, path).unwrap(), Some(vec![]), "{path}");
    }
}

#[test]
fn test_malformed_json_is_distinct_from_not_found() {
    let mut extractor = JsonExtractor::new();
    assert_eq!(extractor.extract("{\"a\": ", "$.a").unwrap(), None);
    assert_eq!(extractor.extract("{\"a\": 1}", "$.b").unwrap(), Some(vec![]));
}

#[test]
fn test_invalid_path_is_error() {
    let mut extractor = JsonExtractor::new();
    let err = extractor.extract(STORE, "store.book").unwrap_err();
    assert!(matches!(err, JsonPathError::Invalid { ref path, .. } if path == "store.book"));
}

#[test]
fn test_cache_is_bounded() {
    let mut extractor = JsonExtractor::new();
    for i in 0..(DEFAULT_CACHE_CAPACITY * 2) {
        extractor.extract(STORE, &format!("$.k{i}")).unwrap();
    }
    assert_eq!(extractor.cache_len(), DEFAULT_CACHE_CAPACITY);

    extractor.extract(STORE, "$.count").unwrap();
    extractor.extract(STORE, "$.count").unwrap();
    assert_eq!(extractor.hits(), 1);
}
