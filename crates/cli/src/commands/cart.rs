//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cli cart show
//!
//! # Add one unit of product 3, then set it to 2 units
//! rs-cli cart add 3
//! rs-cli cart set 3 2
//!
//! # Work offline against a json-server style fixture
//! rs-cli --fixture db.json cart add 1
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Catalog API base URL (not needed with `--fixture`)
//! - `CART_STORAGE_DIR` / `CART_STORAGE_KEY` - Where the cart is persisted

use std::fmt::Write as _;
use std::path::PathBuf;

use rocketshoes_core::ProductId;
use rocketshoes_storefront::cart::{Cart, CartOperation, CartStore, Notice};
use rocketshoes_storefront::catalog::{CatalogApi, CatalogClient, CatalogError, FixtureCatalog};
use rocketshoes_storefront::config::{CartStorageConfig, CatalogConfig, ConfigError};
use rocketshoes_storefront::storage::{FileStorage, StorageError};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be set up.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The persisted cart could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation was refused; the cart is unchanged.
    #[error("{0}")]
    Rejected(Notice),
}

/// What to do with the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Show,
    Add(ProductId),
    Remove(ProductId),
    SetAmount(ProductId, i64),
}

/// Where the catalog and the cart come from.
#[derive(Debug, Clone, Default)]
pub struct CartSource {
    /// Serve the catalog from this fixture instead of `CATALOG_API_URL`
    pub fixture: Option<PathBuf>,
    /// Override `CART_STORAGE_DIR`
    pub storage_dir: Option<PathBuf>,
}

/// Run a cart action and return the rendered cart.
///
/// # Errors
///
/// Returns `CartCommandError::Rejected` with the shopper-facing notice when
/// the operation is refused, or a setup error if the catalog or storage
/// cannot be opened.
pub async fn run(source: &CartSource, action: CartAction) -> Result<String, CartCommandError> {
    dotenvy::dotenv().ok();

    let mut storage_config = CartStorageConfig::from_env();
    if let Some(dir) = &source.storage_dir {
        storage_config.dir.clone_from(dir);
    }
    let storage = FileStorage::new(storage_config.dir);

    if let Some(path) = &source.fixture {
        let catalog = FixtureCatalog::from_path(path)?;
        apply(catalog, storage, storage_config.key, action).await
    } else {
        let catalog = CatalogClient::new(&CatalogConfig::from_env()?)?;
        apply(catalog, storage, storage_config.key, action).await
    }
}

/// Load the cart and apply `action` to it.
///
/// # Errors
///
/// See [`run`].
pub async fn apply<C: CatalogApi>(
    catalog: C,
    storage: FileStorage,
    key: String,
    action: CartAction,
) -> Result<String, CartCommandError> {
    tracing::debug!(dir = %storage.base_path().display(), key = %key, "Opening cart");
    let store = CartStore::load(catalog, storage, key).await?;

    let (operation, result) = match action {
        CartAction::Show => return Ok(render_cart(&store.snapshot().await)),
        CartAction::Add(id) => (CartOperation::Add, store.add_product(id).await),
        CartAction::Remove(id) => (CartOperation::Remove, store.remove_product(id).await),
        CartAction::SetAmount(id, amount) => (
            CartOperation::UpdateAmount,
            store.update_product_amount(id, amount).await,
        ),
    };

    match result {
        Ok(outcome) => Ok(render_cart(outcome.cart())),
        Err(e) => {
            tracing::debug!(error = %e, "Cart operation refused");
            Err(CartCommandError::Rejected(Notice::for_failure(operation, &e)))
        }
    }
}

/// Render the cart as a plain-text table.
#[must_use]
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:>4}  {:<50}  {:>3} x {:>10}  {:>10}",
            item.id(),
            item.product.title,
            item.amount,
            item.product.price.display(),
            item.line_total().display(),
        );
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.subtotal().display()
    );
    out
}
