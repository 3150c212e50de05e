//! Cart route handlers.
//!
//! Mutations answer with the cart as it now stands plus an optional toast
//! notice. A notice is not an HTTP failure: the status is 200 either way and
//! UI components decide how to show it. Successful changes also send
//! `HX-Trigger: cart-updated` so other fragments can refresh.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use rocketshoes_core::ProductId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{
    Cart, CartError, CartItem, CartOperation, CartOutcome, Notice, NoticeView,
};
use crate::catalog::CatalogApi;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::storage::CartStorage;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

/// Body of every mutation response.
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub cart: CartView,
    pub notice: Option<NoticeView>,
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id(),
            title: item.product.title.clone(),
            image: item.product.image.clone(),
            amount: item.amount,
            price: item.product.price.display(),
            line_price: item.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add / remove form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Update amount form data.
#[derive(Debug, Deserialize)]
pub struct UpdateAmountForm {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show<C, S>(State(state): State<AppState<C, S>>) -> Json<CartView>
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    Json(CartView::from(&state.cart().snapshot().await))
}

/// Get cart count badge.
#[instrument(skip(state))]
pub async fn count<C, S>(State(state): State<AppState<C, S>>) -> Json<CartCountView>
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    Json(CartCountView {
        count: state.cart().item_count().await,
    })
}

/// Get a single cart item.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product is not in the cart.
#[instrument(skip(state))]
pub async fn item<C, S>(
    State(state): State<AppState<C, S>>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartItemView>>
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    let cart = state.cart().snapshot().await;
    cart.get(product_id)
        .map(|item| Json(CartItemView::from(item)))
        .ok_or_else(|| AppError::NotFound(format!("cart item {product_id}")))
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add<C, S>(
    State(state): State<AppState<C, S>>,
    Form(form): Form<ProductForm>,
) -> Response
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Add product", Some(&[("product_id", &product_id)]));

    let result = state.cart().add_product(form.product_id).await;
    respond(&state, CartOperation::Add, result).await
}

/// Remove a product from the cart.
#[instrument(skip(state))]
pub async fn remove<C, S>(
    State(state): State<AppState<C, S>>,
    Form(form): Form<ProductForm>,
) -> Response
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Remove product", Some(&[("product_id", &product_id)]));

    let result = state.cart().remove_product(form.product_id).await;
    respond(&state, CartOperation::Remove, result).await
}

/// Set the amount of a product.
#[instrument(skip(state))]
pub async fn update<C, S>(
    State(state): State<AppState<C, S>>,
    Form(form): Form<UpdateAmountForm>,
) -> Response
where
    C: CatalogApi + 'static,
    S: CartStorage + 'static,
{
    let product_id = form.product_id.to_string();
    let amount = form.amount.to_string();
    add_breadcrumb(
        "cart",
        "Update product amount",
        Some(&[("product_id", &product_id), ("amount", &amount)]),
    );

    let result = state
        .cart()
        .update_product_amount(form.product_id, form.amount)
        .await;
    respond(&state, CartOperation::UpdateAmount, result).await
}

/// Turn an operation result into the cart response.
async fn respond<C, S>(
    state: &AppState<C, S>,
    operation: CartOperation,
    result: std::result::Result<CartOutcome, CartError>,
) -> Response
where
    C: CatalogApi,
    S: CartStorage,
{
    match result {
        Ok(CartOutcome::Updated(cart)) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            Json(CartResponse {
                cart: CartView::from(&cart),
                notice: None,
            }),
        )
            .into_response(),
        Ok(CartOutcome::Unchanged(cart)) => Json(CartResponse {
            cart: CartView::from(&cart),
            notice: None,
        })
        .into_response(),
        Err(e) => {
            if e.is_transient() {
                let event_id = sentry::capture_error(&e);
                tracing::error!(
                    error = %e,
                    ?operation,
                    sentry_event_id = %event_id,
                    "Cart operation failed"
                );
            } else {
                tracing::info!(error = %e, ?operation, "Cart operation rejected");
            }

            let notice = Notice::for_failure(operation, &e);
            let cart = state.cart().snapshot().await;
            Json(CartResponse {
                cart: CartView::from(&cart),
                notice: Some(notice.into()),
            })
            .into_response()
        }
    }
}
