//! Catalog API access: stock levels and product records.
//!
//! # Architecture
//!
//! - The catalog API is the source of truth for stock - NO local copy
//! - Stock is read fresh before every quantity change and never cached
//! - Product records are cached via `moka` (see [`CatalogClient`])
//!
//! # Endpoints
//!
//! ```text
//! GET /stock/{id}     -> { "id", "amount" }
//! GET /products/{id}  -> { "id", "title", "price", "image" }
//! ```
//!
//! [`FixtureCatalog`] serves the same data from a local `db.json`-style file
//! for offline use and tests.

mod client;
mod fixture;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use client::CatalogClient;
pub use fixture::{FixtureCatalog, FixtureDocument};

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A fixture file could not be read.
    #[error("Fixture error: {0}")]
    Fixture(#[from] std::io::Error),
}

/// Read access to the remote catalog.
///
/// The cart store is generic over this trait so it can run against the HTTP
/// client, a fixture file, or a test double.
pub trait CatalogApi: Send + Sync {
    /// Fetch the current stock level for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send;

    /// Fetch the full catalog record for a product.
    fn product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, CatalogError>> + Send;
}
