//! Remote catalog records.
//!
//! These mirror the JSON documents served by the catalog API:
//!
//! ```text
//! GET /products/{id}  -> { "id": 1, "title": "...", "price": 179.9, "image": "https://..." }
//! GET /stock/{id}     -> { "id": 1, "amount": 3 }
//! ```

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    pub image: String,
}

/// Units available for one product.
///
/// Read-only: the catalog API is the source of truth and the cart only
/// consults it before admitting a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units can be taken from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}
