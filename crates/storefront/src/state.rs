//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::{CatalogApi, CatalogClient};
use crate::storage::{CartStorage, FileStorage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands every handler the
/// same [`CartStore`]. The defaults are the production catalog client and
/// file storage; tests plug in in-memory doubles.
pub struct AppState<C = CatalogClient, S = FileStorage> {
    inner: Arc<AppStateInner<C, S>>,
}

struct AppStateInner<C, S> {
    cart: CartStore<C, S>,
}

// Manual impl: cloning only bumps the Arc, so C and S need not be Clone
impl<C, S> Clone for AppState<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S> AppState<C, S>
where
    C: CatalogApi,
    S: CartStorage,
{
    /// Create a new application state around a loaded cart.
    #[must_use]
    pub fn new(cart: CartStore<C, S>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cart }),
        }
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore<C, S> {
        &self.inner.cart
    }
}
