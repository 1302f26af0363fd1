use super::fixtures::sample_item;
use super::*;
use serde_json::json;

fn sample_item_json(id: &str) -> serde_json::Value {
    serde_json::to_value(sample_item(id)).expect("item should serialize")
}

#[test]
fn parse_valid_item() {
    let item = Item::parse(sample_item_json("item-1")).expect("valid item should parse");
    assert_eq!(item.item_id, "item-1");
    assert_eq!(item.user_reviews.len(), 2);
}

#[test]
fn parse_rejects_missing_field() {
    let mut value = sample_item_json("item-1");
    value
        .as_object_mut()
        .expect("should be object")
        .remove("brand");

    let err = Item::parse(value).expect_err("missing field should be rejected");
    match err {
        SeedError::SchemaViolation(msg) => assert!(msg.contains("brand"), "got: {}", msg),
        other => panic!("expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn parse_rejects_wrong_type() {
    let mut value = sample_item_json("item-1");
    value["prices"]["full_price"] = json!("not a number");

    assert!(matches!(
        Item::parse(value),
        Err(SeedError::SchemaViolation(_))
    ));
}

#[test]
fn parse_rejects_malformed_address() {
    let mut value = sample_item_json("item-1");
    value["manufacturer_address"]
        .as_object_mut()
        .expect("should be object")
        .remove("country");

    assert!(matches!(
        Item::parse(value),
        Err(SeedError::SchemaViolation(_))
    ));
}

#[test]
fn absent_notes_is_distinct_from_empty() {
    let mut value = sample_item_json("item-1");
    value
        .as_object_mut()
        .expect("should be object")
        .remove("notes");
    let absent = Item::parse(value).expect("item without notes should parse");
    assert_eq!(absent.notes, None);

    let mut value = sample_item_json("item-1");
    value["notes"] = json!("");
    let empty = Item::parse(value).expect("item with empty notes should parse");
    assert_eq!(empty.notes, Some(String::new()));
}

#[test]
fn batch_parse_accepts_fenced_json() {
    let raw = format!(
        "Here are the items:\n```json\n[{}]\n```\n",
        serde_json::to_string(&sample_item("item-1")).expect("should serialize")
    );

    let items = parse_item_batch(&raw).expect("fenced array should parse");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_id, "item-1");
}

#[test]
fn batch_parse_fails_closed_on_one_invalid_record() {
    let mut bad = sample_item_json("item-2");
    bad.as_object_mut()
        .expect("should be object")
        .remove("item_name");
    let raw = serde_json::to_string(&vec![sample_item_json("item-1"), bad])
        .expect("should serialize");

    let err = parse_item_batch(&raw).expect_err("one invalid record should reject the batch");
    assert!(matches!(err, SeedError::SchemaViolation(_)));
}

#[test]
fn batch_parse_rejects_non_json() {
    assert!(matches!(
        parse_item_batch("I could not generate any items, sorry."),
        Err(SeedError::Parse(_))
    ));
    assert!(matches!(
        parse_item_batch("[{ this is not json }]"),
        Err(SeedError::Parse(_))
    ));
}

#[test]
fn summary_matches_fixed_template() {
    let item = sample_item("item-1");
    let summary = summarize(&item);

    assert_eq!(
        summary,
        "Oak Bookshelf A five-shelf solid oak bookshelf from the brand Northwood. \
         Manufacturer: Made in Estonia. \
         Categories: Storage, Living Room. \
         Reviews: Rated 4.5 on 2024-03-01: Sturdy and easy to assemble  \
         Rated 5 on 2024-04-12: Looks great . \
         Price: At full price it costs: 249.99 USD, On sale it costs: 199.99 USD. \
         Notes: Ships flat-packed"
    );
}

#[test]
fn summary_is_deterministic() {
    let item = sample_item("item-1");
    assert_eq!(summarize(&item), summarize(&item));
}

#[test]
fn absent_notes_renders_missing_marker() {
    let mut item = sample_item("item-1");
    item.notes = None;
    let summary = summarize(&item);
    assert!(summary.ends_with("Notes: None"), "got: {}", summary);
}

#[test]
fn empty_categories_and_reviews_keep_separators() {
    let mut item = sample_item("item-1");
    item.categories.clear();
    item.user_reviews.clear();
    let summary = summarize(&item);
    assert!(summary.contains("Categories: . Reviews: . Price:"));
}
