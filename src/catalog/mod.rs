// Catalog data model
// Schema definition, validation of untrusted generated data, and the
// deterministic summary rendering used as the embedding text basis

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, SeedError};

/// One synthetic catalog entry. Field shapes are the schema contract that
/// generated data must satisfy in full before it is summarized or embedded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub item_id: String,
    pub item_name: String,
    pub item_description: String,
    pub brand: String,
    pub manufacturer_address: ManufacturerAddress,
    pub prices: Prices,
    /// Order carries no meaning; may be empty.
    pub categories: Vec<String>,
    pub user_reviews: Vec<Review>,
    /// Absent is a valid state distinct from an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManufacturerAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// No invariant is enforced between the two prices; generated values are
/// trusted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prices {
    pub full_price: f64,
    pub sale_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub review_date: String,
    pub review_comment: String,
    /// No bound on the rating range is enforced.
    pub rating: f64,
}

impl Item {
    /// Validate an arbitrary parsed structure against the item schema.
    ///
    /// All-or-nothing: either the value fully conforms and an `Item` is
    /// returned, or the error names the offending field and expected shape.
    #[inline]
    pub fn parse(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| SeedError::SchemaViolation(e.to_string()))
    }
}

/// Parse a raw model response into a fully validated item batch.
///
/// Fails closed: a single malformed or non-conforming record rejects the
/// whole batch.
#[inline]
pub fn parse_item_batch(raw: &str) -> Result<Vec<Item>> {
    let json = extract_json_array(raw)
        .ok_or_else(|| SeedError::Parse("response contains no JSON array".to_string()))?;

    let values: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| SeedError::Parse(format!("response is not a valid JSON array: {}", e)))?;

    values.into_iter().map(Item::parse).collect()
}

/// Locate the JSON array payload within a raw model response, tolerating
/// markdown fences and surrounding prose.
fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Render one item into the single-paragraph summary used for embedding.
///
/// Pure and deterministic: the same item always yields a byte-identical
/// string. An absent `notes` renders as the literal marker "None" rather
/// than being omitted; downstream consumers rely on the fixed segment order.
#[inline]
pub fn summarize(item: &Item) -> String {
    let basic_info = format!(
        "{} {} from the brand {}",
        item.item_name, item.item_description, item.brand
    );

    // Only the country is rendered; the rest of the address is validated but
    // intentionally left out of the summary.
    let manufacturer_details = format!("Made in {}", item.manufacturer_address.country);

    let categories = item.categories.join(", ");

    let user_reviews = item
        .user_reviews
        .iter()
        .map(|r| format!("Rated {} on {}: {} ", r.rating, r.review_date, r.review_comment))
        .collect::<Vec<_>>()
        .join(" ");

    let price = format!(
        "At full price it costs: {} USD, On sale it costs: {} USD",
        item.prices.full_price, item.prices.sale_price
    );

    let notes = item.notes.as_deref().unwrap_or("None");

    format!(
        "{}. Manufacturer: {}. Categories: {}. Reviews: {}. Price: {}. Notes: {}",
        basic_info, manufacturer_details, categories, user_reviews, price, notes
    )
}
