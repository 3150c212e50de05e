//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use rocketshoes_core::{Product, ProductId};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::CatalogApi;
use crate::error::Result;
use crate::state::AppState;
use crate::storage::CartStorage;

/// Product display data, with how many units are already in the cart.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: String,
    pub cart_amount: u32,
}

impl ProductView {
    fn new(product: Product, cart_amount: u32) -> Self {
        Self {
            id: product.id,
            price: product.price.display(),
            title: product.title,
            image: product.image,
            cart_amount,
        }
    }
}

/// Display a product from the catalog.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown products and `AppError::Catalog`
/// if the catalog cannot be reached.
#[instrument(skip(state))]
pub async fn show<C, S>(
    State(state): State<AppState<C, S>>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductView>>
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    let product = state.cart().catalog().product(product_id).await?;
    let cart_amount = state.cart().snapshot().await.amount_of(product_id);

    Ok(Json(ProductView::new(product, cart_amount)))
}
