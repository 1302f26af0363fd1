//! Shared item fixtures for unit and integration-style tests.

use super::{Item, ManufacturerAddress, Prices, Review};

pub(crate) fn sample_item(id: &str) -> Item {
    Item {
        item_id: id.to_string(),
        item_name: "Oak Bookshelf".to_string(),
        item_description: "A five-shelf solid oak bookshelf".to_string(),
        brand: "Northwood".to_string(),
        manufacturer_address: ManufacturerAddress {
            street: "12 Mill Road".to_string(),
            city: "Tallinn".to_string(),
            state: "Harju".to_string(),
            postal_code: "10115".to_string(),
            country: "Estonia".to_string(),
        },
        prices: Prices {
            full_price: 249.99,
            sale_price: 199.99,
        },
        categories: vec!["Storage".to_string(), "Living Room".to_string()],
        user_reviews: vec![
            Review {
                review_date: "2024-03-01".to_string(),
                review_comment: "Sturdy and easy to assemble".to_string(),
                rating: 4.5,
            },
            Review {
                review_date: "2024-04-12".to_string(),
                review_comment: "Looks great".to_string(),
                rating: 5.0,
            },
        ],
        notes: Some("Ships flat-packed".to_string()),
    }
}
