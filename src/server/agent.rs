//! Retrieval-grounded chat agent over the seeded catalog.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::generator::TextGenerator;
use crate::seeder::Embedder;
use crate::server::ChatAgent;
use crate::store::CatalogStore;

const DEFAULT_TOP_K: usize = 5;

/// Answers a message by embedding it, fetching the nearest catalog summaries,
/// and asking the generation model with those summaries as context.
pub struct RetrievalAgent<C> {
    store: Arc<CatalogStore>,
    client: C,
    top_k: usize,
}

impl<C: Embedder + TextGenerator> RetrievalAgent<C> {
    #[inline]
    pub fn new(store: Arc<CatalogStore>, client: C) -> Self {
        Self {
            store,
            client,
            top_k: DEFAULT_TOP_K,
        }
    }

    #[inline]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl<C: Embedder + TextGenerator> ChatAgent for RetrievalAgent<C> {
    async fn call(&self, message: &str, thread_id: &str) -> anyhow::Result<String> {
        debug!("Running retrieval for thread {}", thread_id);

        let query_vector = self.client.embed(message)?;
        let hits = self.store.search_similar(&query_vector, self.top_k).await?;

        debug!("Retrieved {} catalog documents for context", hits.len());

        let context = hits
            .iter()
            .map(|hit| format!("- {}", hit.page_content))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "You are a helpful assistant for a product catalog.\n\
             Use only the catalog entries below to answer the customer.\n\n\
             Catalog entries:\n{context}\n\n\
             Customer message: {message}\n\n\
             Answer:",
        );

        let answer = self.client.complete(&prompt)?;
        Ok(answer)
    }
}
