// Synthetic data generator
// Builds one schema-directed prompt, sends it to the text-generation
// capability, and parses the response into a fully validated item batch

#[cfg(test)]
mod tests;

use tracing::{debug, info};

use crate::catalog::{Item, parse_item_batch};
use crate::{Result, SeedError};

/// External text-generation capability, injected so tests can substitute a
/// canned implementation.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Generates synthetic catalog records through an external language model.
pub struct SyntheticGenerator<G: TextGenerator> {
    client: G,
    domain: String,
}

impl<G: TextGenerator> SyntheticGenerator<G> {
    #[inline]
    pub fn new(client: G) -> Self {
        Self {
            client,
            domain: "furniture items".to_string(),
        }
    }

    #[inline]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Generate exactly `count` validated items.
    ///
    /// One upstream call, no retry at this layer. Guarantee: on success every
    /// returned element satisfies the item schema. On failure the whole batch
    /// is rejected; there is no per-record fallback.
    #[inline]
    pub fn generate(&self, count: usize) -> Result<Vec<Item>> {
        let prompt = self.build_prompt(count);
        debug!("Generation prompt:\n{}", prompt);

        let raw = self
            .client
            .complete(&prompt)
            .map_err(|e| SeedError::Generation(e.to_string()))?;

        debug!("Raw generation response ({} characters)", raw.len());

        let items = parse_item_batch(&raw)?;
        info!("Generated {} validated items", items.len());
        Ok(items)
    }

    /// Natural-language instructions plus a schema-derived formatting
    /// directive, so the raw text output is structured enough to parse.
    fn build_prompt(&self, count: usize) -> String {
        format!(
            "You are a seeding script for a product catalog database.\n\
             Generate {count} {domain}. Every record must include the following fields: \
             item_id, item_name, item_description, brand, manufacturer_address, prices, \
             categories, user_reviews, notes.\n\n\
             Respond ONLY with a JSON array of {count} objects matching this schema exactly:\n\
             {schema}\n\n\
             Do not include any text outside the JSON array.",
            count = count,
            domain = self.domain,
            schema = ITEM_SCHEMA_DIRECTIVE,
        )
    }
}

/// Machine-readable formatting directive derived from the item schema.
const ITEM_SCHEMA_DIRECTIVE: &str = r#"[
  {
    "item_id": "string",
    "item_name": "string",
    "item_description": "string",
    "brand": "string",
    "manufacturer_address": {
      "street": "string",
      "city": "string",
      "state": "string",
      "postal_code": "string",
      "country": "string"
    },
    "prices": {
      "full_price": 0.0,
      "sale_price": 0.0
    },
    "categories": ["string"],
    "user_reviews": [
      {
        "review_date": "YYYY-MM-DD",
        "review_comment": "string",
        "rating": 0.0
      }
    ],
    "notes": "string"
  }
]"#;
