#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

/// End-to-end seeding pipeline tests with stubbed generation and embedding
/// capabilities against a real vector database in a temp directory.
use stockroom::SeedError;
use stockroom::catalog::{Item, ManufacturerAddress, Prices, Review};
use stockroom::config::{Config, DatabaseConfig, OllamaConfig, ServerConfig};
use stockroom::generator::{SyntheticGenerator, TextGenerator};
use stockroom::seeder::{Embedder, Seeder};
use stockroom::store::CatalogStore;
use tempfile::TempDir;

const DIMENSION: usize = 64;

fn catalog_item(id: &str, name: &str) -> Item {
    Item {
        item_id: id.to_string(),
        item_name: name.to_string(),
        item_description: format!("A well-made {}", name.to_lowercase()),
        brand: "Northwood".to_string(),
        manufacturer_address: ManufacturerAddress {
            street: "12 Mill Road".to_string(),
            city: "Tallinn".to_string(),
            state: "Harju".to_string(),
            postal_code: "10115".to_string(),
            country: "Estonia".to_string(),
        },
        prices: Prices {
            full_price: 120.0,
            sale_price: 89.5,
        },
        categories: vec!["Furniture".to_string()],
        user_reviews: vec![Review {
            review_date: "2024-05-02".to_string(),
            review_comment: "Very solid".to_string(),
            rating: 4.0,
        }],
        notes: None,
    }
}

struct CannedGenerator {
    response: String,
}

impl TextGenerator for CannedGenerator {
    fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok(self.response.clone())
    }
}

struct HashEmbedder;

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let base = text.bytes().map(u32::from).sum::<u32>() as f32;
        Ok((0..DIMENSION)
            .map(|i| (base * 0.001 + i as f32 * 0.3).cos())
            .collect())
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}

fn test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        ollama: OllamaConfig {
            embedding_dimension: DIMENSION as u32,
            ..OllamaConfig::default()
        },
        database: DatabaseConfig::default(),
        server: ServerConfig::default(),
        base_dir: temp_dir.path().to_path_buf(),
    };
    (config, temp_dir)
}

fn three_item_response() -> String {
    let items = vec![
        catalog_item("chair-1", "Oak Chair"),
        catalog_item("table-1", "Walnut Table"),
        catalog_item("lamp-1", "Brass Lamp"),
    ];
    serde_json::to_string(&items).expect("items should serialize")
}

async fn build_seeder(
    config: &Config,
    response: String,
) -> Seeder<CannedGenerator, HashEmbedder> {
    let store = CatalogStore::connect(config)
        .await
        .expect("should connect to store");
    Seeder::new(
        store,
        SyntheticGenerator::new(CannedGenerator { response }),
        HashEmbedder,
    )
}

#[tokio::test]
async fn seed_three_items_end_to_end() {
    let (config, _temp_dir) = test_config();
    let seeder = build_seeder(&config, three_item_response()).await;

    let stats = seeder.run(3).await.expect("seeding should succeed");
    assert_eq!(stats.items_persisted, 3);

    let count = seeder.store().count().await.expect("count should succeed");
    assert_eq!(count, 3);

    // Every document carries a summary text field and a full-length embedding
    // (search returns them; a short query still scans all three)
    let query = HashEmbedder.embed("oak chair").expect("stub embed");
    assert_eq!(query.len(), DIMENSION);
    let hits = seeder
        .store()
        .search_similar(&query, 10)
        .await
        .expect("search should succeed");
    assert_eq!(hits.len(), 3);
    for hit in &hits {
        assert!(hit.page_content.contains("from the brand Northwood"));
        assert!(hit.page_content.ends_with("Notes: None"));
        assert!(!hit.item.item_id.is_empty());
    }
}

#[tokio::test]
async fn reseeding_is_idempotent_not_additive() {
    let (config, _temp_dir) = test_config();
    let seeder = build_seeder(&config, three_item_response()).await;

    seeder.run(3).await.expect("first run should succeed");
    seeder.run(3).await.expect("second run should succeed");

    let count = seeder.store().count().await.expect("count should succeed");
    assert_eq!(count, 3, "old documents must be cleared, not duplicated");
}

#[tokio::test]
async fn failed_generation_writes_nothing() {
    let (config, _temp_dir) = test_config();

    // Seed successfully first so there is prior content to clear
    let seeder = build_seeder(&config, three_item_response()).await;
    seeder.run(3).await.expect("first run should succeed");

    let broken = build_seeder(&config, "{ not an item array".to_string()).await;
    let err = broken.run(3).await.expect_err("broken run should fail");
    assert!(matches!(err, SeedError::Parse(_)));

    // Collection is in its pre-run (cleared) state
    let count = broken.store().count().await.expect("count should succeed");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn schema_violation_in_generated_batch_fails_closed() {
    let (config, _temp_dir) = test_config();

    let mut values = vec![
        serde_json::to_value(catalog_item("chair-1", "Oak Chair")).expect("should serialize"),
        serde_json::to_value(catalog_item("table-1", "Walnut Table")).expect("should serialize"),
    ];
    values[1]
        .as_object_mut()
        .expect("should be object")
        .remove("manufacturer_address");
    let response = serde_json::to_string(&values).expect("should serialize");

    let seeder = build_seeder(&config, response).await;
    let err = seeder.run(2).await.expect_err("run should fail closed");
    assert!(matches!(err, SeedError::SchemaViolation(_)));

    let count = seeder.store().count().await.expect("count should succeed");
    assert_eq!(count, 0, "no valid subset may be accepted");
}
