//! Catalog backed by a local JSON document.
//!
//! The document has the same shape the catalog API is usually mocked with:
//!
//! ```json
//! {
//!   "products": [{ "id": 1, "title": "...", "price": 179.9, "image": "..." }],
//!   "stock": [{ "id": 1, "amount": 3 }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use rocketshoes_core::{Product, ProductId, Stock};
use serde::{Deserialize, Serialize};

use super::{CatalogApi, CatalogError};

/// On-disk fixture layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<Stock>,
}

/// In-process catalog with fixed products and stock.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, Stock>,
}

impl FixtureCatalog {
    /// Build a catalog from a parsed document.
    #[must_use]
    pub fn new(document: FixtureDocument) -> Self {
        Self {
            products: document.products.into_iter().map(|p| (p.id, p)).collect(),
            stock: document.stock.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    /// Load a fixture document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a fixture document.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let document: FixtureDocument = serde_json::from_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            products = document.products.len(),
            "Loaded catalog fixture"
        );
        Ok(Self::new(document))
    }

    /// Add or replace a product and its stock level.
    #[must_use]
    pub fn with_product(mut self, product: Product, available: u32) -> Self {
        let id = product.id;
        self.products.insert(id, product);
        self.stock.insert(
            id,
            Stock {
                id,
                amount: available,
            },
        );
        self
    }
}

impl CatalogApi for FixtureCatalog {
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.stock
            .get(&id)
            .copied()
            .ok_or_else(|| CatalogError::NotFound(format!("stock/{id}")))
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DB_JSON: &str = r#"{
        "products": [
            { "id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://cdn.example.com/tenis1.jpg" },
            { "id": 2, "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino", "price": 139.9, "image": "https://cdn.example.com/tenis2.jpg" }
        ],
        "stock": [
            { "id": 1, "amount": 3 },
            { "id": 2, "amount": 5 }
        ]
    }"#;

    #[tokio::test]
    async fn test_fixture_serves_products_and_stock() {
        let document: FixtureDocument = serde_json::from_str(DB_JSON).unwrap();
        let catalog = FixtureCatalog::new(document);

        let stock = catalog.stock(ProductId::new(2)).await.unwrap();
        assert_eq!(stock.amount, 5);

        let product = catalog.product(ProductId::new(1)).await.unwrap();
        assert_eq!(product.price.display(), "$179.90");
    }

    #[tokio::test]
    async fn test_fixture_unknown_id_is_not_found() {
        let catalog = FixtureCatalog::default();
        let err = catalog.stock(ProductId::new(99)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(path) if path == "stock/99"));
    }

    #[test]
    fn test_fixture_missing_file() {
        let err = FixtureCatalog::from_path(Path::new("/nonexistent/db.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Fixture(_)));
    }
}
