use super::*;
use crate::catalog::fixtures::sample_item;

struct CannedGenerator {
    response: String,
}

impl TextGenerator for CannedGenerator {
    fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.response.clone())
    }
}

struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("upstream model unavailable"))
    }
}

fn canned_batch(count: usize) -> String {
    let items: Vec<_> = (0..count).map(|i| sample_item(&format!("item-{}", i))).collect();
    serde_json::to_string(&items).expect("items should serialize")
}

#[test]
fn generates_validated_batch() {
    let generator = SyntheticGenerator::new(CannedGenerator {
        response: canned_batch(3),
    });

    let items = generator.generate(3).expect("batch should generate");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].item_id, "item-0");
}

#[test]
fn prompt_names_count_domain_and_fields() {
    let generator = SyntheticGenerator::new(CannedGenerator {
        response: String::new(),
    })
    .with_domain("office chairs");

    let prompt = generator.build_prompt(7);
    assert!(prompt.contains("Generate 7 office chairs"));
    for field in [
        "item_id",
        "item_name",
        "item_description",
        "brand",
        "manufacturer_address",
        "prices",
        "categories",
        "user_reviews",
        "notes",
    ] {
        assert!(prompt.contains(field), "prompt is missing field {}", field);
    }
}

#[test]
fn upstream_failure_surfaces_as_generation_error() {
    let generator = SyntheticGenerator::new(FailingGenerator);
    assert!(matches!(
        generator.generate(3),
        Err(SeedError::Generation(_))
    ));
}

#[test]
fn unparseable_response_surfaces_as_parse_error() {
    let generator = SyntheticGenerator::new(CannedGenerator {
        response: "I'm sorry, I can't help with that.".to_string(),
    });
    assert!(matches!(generator.generate(3), Err(SeedError::Parse(_))));
}

#[test]
fn one_invalid_record_fails_the_whole_batch() {
    let mut values: Vec<serde_json::Value> = vec![
        serde_json::to_value(sample_item("item-0")).expect("should serialize"),
        serde_json::to_value(sample_item("item-1")).expect("should serialize"),
    ];
    values[1]
        .as_object_mut()
        .expect("should be object")
        .remove("prices");

    let generator = SyntheticGenerator::new(CannedGenerator {
        response: serde_json::to_string(&values).expect("should serialize"),
    });

    assert!(matches!(
        generator.generate(2),
        Err(SeedError::SchemaViolation(_))
    ));
}
