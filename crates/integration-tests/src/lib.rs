//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store operations, persistence and concurrency
//! - `cart_routes` - The HTTP surface driven through the router
//!
//! This library holds the shared doubles: a catalog whose lookups can be
//! made to fail and a storage whose writes can be made to fail.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rocketshoes_core::{Price, Product, ProductId, Stock};
use rocketshoes_storefront::catalog::{CatalogApi, CatalogError, FixtureCatalog};
use rocketshoes_storefront::storage::{CartStorage, MemoryStorage, StorageError};

/// Storage key used throughout the tests.
pub const CART_KEY: &str = "@RocketShoes:cart";

/// A catalog product priced at `cents`.
#[must_use]
pub fn shoe(id: i32, cents: u32) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Tênis {id}"),
        price: Price::from_cents(cents),
        image: format!("https://cdn.example.com/tenis{id}.jpg"),
    }
}

/// Three products: #1 with 3 in stock, #2 with 1, #3 sold out.
#[must_use]
pub fn fixture_catalog() -> FixtureCatalog {
    FixtureCatalog::default()
        .with_product(shoe(1, 17990), 3)
        .with_product(shoe(2, 13990), 1)
        .with_product(shoe(3, 22990), 0)
}

/// Catalog double with switchable failures and a stock-call counter.
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    inner: FixtureCatalog,
    fail_stock: AtomicBool,
    fail_product: AtomicBool,
    stock_calls: AtomicUsize,
}

impl ScriptedCatalog {
    #[must_use]
    pub fn new(inner: FixtureCatalog) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_stock(&self, fail: bool) {
        self.fail_stock.store(fail, Ordering::SeqCst);
    }

    pub fn fail_product(&self, fail: bool) {
        self.fail_product.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }
}

impl CatalogApi for ScriptedCatalog {
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        // Give other tasks a chance to interleave, like a real network call
        tokio::task::yield_now().await;
        if self.fail_stock.load(Ordering::SeqCst) {
            return Err(CatalogError::Status {
                status: 503,
                body: "stock service unavailable".to_string(),
            });
        }
        self.inner.stock(id).await
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        tokio::task::yield_now().await;
        if self.fail_product.load(Ordering::SeqCst) {
            return Err(CatalogError::RateLimited(30));
        }
        self.inner.product(id).await
    }
}

/// In-memory storage whose writes can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
}

impl FlakyStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The raw persisted value under [`CART_KEY`].
    #[must_use]
    pub fn persisted(&self) -> Option<String> {
        self.inner.peek(CART_KEY)
    }
}

impl CartStorage for FlakyStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("quota exceeded".to_string()));
        }
        self.inner.set_item(key, value).await
    }
}
