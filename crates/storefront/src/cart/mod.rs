//! Shopping cart state.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the in-memory cart and mirrors it to a [`CartStorage`]
//!   slot after every successful mutation
//! - Quantity changes are admitted only after a fresh stock read from the
//!   [`CatalogApi`]
//! - Operations return `Result<CartOutcome, CartError>`; [`Notice`] turns a
//!   failure into the toast a shopper sees
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::cart::{CartOperation, CartStore, Notice};
//!
//! let store = CartStore::load(catalog, storage, "@RocketShoes:cart").await?;
//!
//! match store.add_product(ProductId::new(1)).await {
//!     Ok(outcome) => render(outcome.cart()),
//!     Err(e) => toast(Notice::for_failure(CartOperation::Add, &e)),
//! }
//! ```
//!
//! [`CartStorage`]: crate::storage::CartStorage
//! [`CatalogApi`]: crate::catalog::CatalogApi

mod model;
mod notice;
mod store;

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

pub use model::{Cart, CartItem};
pub use notice::{CartOperation, Notice, NoticeLevel, NoticeView};
pub use store::{CartOutcome, CartStore};

/// Why a cart operation did not change the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested amount exceeds the stock seen at the last check.
    #[error("Requested {requested} of product {product_id} but only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Stock or product lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Whether the failure came from outside the cart's own rules.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Catalog(_) | Self::Storage(_))
    }
}
