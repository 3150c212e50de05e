//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness (cart storage reachable)
//!
//! # Products
//! GET  /products/{id}          - Product detail with in-cart amount
//!
//! # Cart
//! GET  /cart                   - Cart view (items, prices, subtotal, count)
//! GET  /cart/count             - Cart count badge
//! GET  /cart/items/{id}        - Single cart item
//! POST /cart/add               - Add one unit (form: product_id)
//! POST /cart/remove            - Remove item (form: product_id)
//! POST /cart/update            - Set amount (form: product_id, amount)
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::catalog::CatalogApi;
use crate::state::AppState;
use crate::storage::CartStorage;

/// Create the cart routes router.
pub fn cart_routes<C, S>() -> Router<AppState<C, S>>
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    Router::new()
        .route("/", get(cart::show::<C, S>))
        .route("/count", get(cart::count::<C, S>))
        .route("/items/{product_id}", get(cart::item::<C, S>))
        .route("/add", post(cart::add::<C, S>))
        .route("/remove", post(cart::remove::<C, S>))
        .route("/update", post(cart::update::<C, S>))
}

/// Create all application routes.
pub fn routes<C, S>() -> Router<AppState<C, S>>
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    Router::new()
        .route("/products/{product_id}", get(products::show::<C, S>))
        .nest("/cart", cart_routes())
}
