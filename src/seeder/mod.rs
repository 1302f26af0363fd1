// Seeding orchestrator
// Linear pipeline: connect -> provision -> clear -> generate -> embed+persist


use tracing::{info, warn};

use crate::catalog::summarize;
use crate::generator::{SyntheticGenerator, TextGenerator};
use crate::store::{CatalogStore, IndexedRecord};
use crate::{Result, SeedError};

/// External embedding capability, injected so tests can substitute a
/// deterministic implementation.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedingStats {
    pub items_requested: usize,
    pub items_persisted: usize,
}

/// One-shot seeding pipeline. Exactly one instance is assumed to run at a
/// time; the clear step establishes a clean starting state each run.
pub struct Seeder<G: TextGenerator, E: Embedder> {
    store: CatalogStore,
    generator: SyntheticGenerator<G>,
    embedder: E,
}

impl<G: TextGenerator, E: Embedder> Seeder<G, E> {
    #[inline]
    pub fn new(store: CatalogStore, generator: SyntheticGenerator<G>, embedder: E) -> Self {
        Self {
            store,
            generator,
            embedder,
        }
    }

    /// Run the full pipeline. Any error other than index provisioning
    /// propagates to the caller after whatever work was already durably
    /// written; there is no rollback and no partial-success reporting beyond
    /// the per-item progress lines.
    #[inline]
    pub async fn run(&self, count: usize) -> Result<SeedingStats> {
        self.store.ping().await?;

        self.store.ensure_collection().await?;

        // The only swallowed error in the pipeline: the run continues against
        // a collection that may lack a working vector index.
        if let Err(e) = self.store.ensure_vector_index().await {
            warn!("Vector index provisioning failed, continuing: {}", e);
        }

        self.store.clear().await?;

        let items = self.generator.generate(count)?;
        let total = items.len();

        let mut persisted = 0;
        for (position, item) in items.into_iter().enumerate() {
            let item_id = item.item_id.clone();
            self.persist_item(item).await?;
            persisted += 1;
            info!("Persisted item {}/{} ({})", position + 1, total, item_id);
        }

        Ok(SeedingStats {
            items_requested: count,
            items_persisted: persisted,
        })
    }

    /// Summarize, embed, and write one item. Sequential with its siblings;
    /// items are never processed concurrently within a run.
    async fn persist_item(&self, item: crate::catalog::Item) -> Result<()> {
        let page_content = summarize(&item);

        let embedding = self.embedder.embed(&page_content).map_err(|e| {
            SeedError::Persistence(format!(
                "Embedding failed for item {}: {}",
                item.item_id, e
            ))
        })?;

        self.store
            .insert(IndexedRecord::new(item, page_content, embedding))
            .await
    }

    /// Access to the underlying store, for post-run inspection
    #[inline]
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }
}
