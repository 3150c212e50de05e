//! The cart store: add, remove and set-quantity over a persisted cart.

use rocketshoes_core::ProductId;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::{Cart, CartError, CartItem};
use crate::catalog::CatalogApi;
use crate::storage::{CartStorage, StorageError};

/// Result of an operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOutcome {
    /// The cart changed and was persisted.
    Updated(Cart),
    /// The request was ignored; the cart is as it was.
    Unchanged(Cart),
}

impl CartOutcome {
    /// The cart after the operation.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        match self {
            Self::Updated(cart) | Self::Unchanged(cart) => cart,
        }
    }

    #[must_use]
    pub fn into_cart(self) -> Cart {
        match self {
            Self::Updated(cart) | Self::Unchanged(cart) => cart,
        }
    }

    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// A cart mirrored to a storage slot.
///
/// Operations hold the cart lock from the first read to the final commit,
/// so concurrent requests apply one after another. Each mutation is built on
/// a copy that replaces the in-memory cart only once it has been persisted.
pub struct CartStore<C, S> {
    catalog: C,
    storage: S,
    key: String,
    cart: Mutex<Cart>,
}

impl<C, S> CartStore<C, S>
where
    C: CatalogApi,
    S: CartStorage,
{
    /// Open the cart persisted under `key`.
    ///
    /// An empty slot gives an empty cart. A slot that does not hold a cart
    /// is logged and treated as empty; it is overwritten by the next
    /// successful mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage slot cannot be read.
    pub async fn load(catalog: C, storage: S, key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();

        let cart = match storage.get_item(&key).await? {
            None => Cart::new(),
            Some(raw) => Cart::from_json(&raw).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Stored cart is unreadable, starting empty");
                Cart::new()
            }),
        };

        info!(key = %key, items = cart.items().len(), "Cart loaded");

        Ok(Self {
            catalog,
            storage,
            key,
            cart: Mutex::new(cart),
        })
    }

    /// A copy of the current cart.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Total units in the cart.
    pub async fn item_count(&self) -> u32 {
        self.cart.lock().await.item_count()
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add one unit of `id`.
    ///
    /// A product already in the cart has its amount incremented; a new one
    /// is fetched from the catalog and appended with amount 1.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if one more unit exceeds the current stock
    /// - [`CartError::Catalog`] if the stock or product lookup fails
    /// - [`CartError::Storage`] if the cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&self, id: ProductId) -> Result<CartOutcome, CartError> {
        let mut cart = self.cart.lock().await;

        let requested = cart.amount_of(id).saturating_add(1);
        self.check_stock(id, requested).await?;

        let mut updated = cart.clone();
        if let Some(item) = updated.get_mut(id) {
            item.amount = requested;
        } else {
            let product = self.catalog.product(id).await?;
            updated.push(CartItem::new(product));
        }

        self.persist(&updated).await?;
        *cart = updated;

        info!(amount = requested, "Product added to cart");
        Ok(CartOutcome::Updated(cart.clone()))
    }

    /// Remove `id` from the cart entirely.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`] if the product is not in the cart
    /// - [`CartError::Storage`] if the cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_product(&self, id: ProductId) -> Result<CartOutcome, CartError> {
        let mut cart = self.cart.lock().await;

        let mut updated = cart.clone();
        if updated.remove(id).is_none() {
            warn!("Remove requested for product not in cart");
            return Err(CartError::NotInCart(id));
        }

        self.persist(&updated).await?;
        *cart = updated;

        info!("Product removed from cart");
        Ok(CartOutcome::Updated(cart.clone()))
    }

    /// Set the amount of `id` to exactly `amount`.
    ///
    /// Amounts of zero or less are ignored and return
    /// [`CartOutcome::Unchanged`] without consulting the catalog.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`] if `amount` exceeds the current stock
    /// - [`CartError::NotInCart`] if the product is not in the cart
    /// - [`CartError::Catalog`] if the stock lookup fails
    /// - [`CartError::Storage`] if the cart cannot be persisted
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_product_amount(
        &self,
        id: ProductId,
        amount: i64,
    ) -> Result<CartOutcome, CartError> {
        let mut cart = self.cart.lock().await;

        if amount <= 0 {
            return Ok(CartOutcome::Unchanged(cart.clone()));
        }
        // Beyond u32 no stock can cover it, so saturate and let the check fail
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);

        self.check_stock(id, requested).await?;

        let mut updated = cart.clone();
        let Some(item) = updated.get_mut(id) else {
            warn!("Amount update requested for product not in cart");
            return Err(CartError::NotInCart(id));
        };
        item.amount = requested;

        self.persist(&updated).await?;
        *cart = updated;

        info!(amount = requested, "Product amount updated");
        Ok(CartOutcome::Updated(cart.clone()))
    }

    /// Fail with `OutOfStock` unless the catalog has `requested` units of `id`.
    async fn check_stock(&self, id: ProductId, requested: u32) -> Result<(), CartError> {
        let stock = self.catalog.stock(id).await?;
        if stock.covers(requested) {
            return Ok(());
        }

        warn!(requested, available = stock.amount, "Requested amount exceeds stock");
        Err(CartError::OutOfStock {
            product_id: id,
            requested,
            available: stock.amount,
        })
    }

    async fn persist(&self, cart: &Cart) -> Result<(), CartError> {
        let raw = cart.to_json().map_err(StorageError::from)?;
        self.storage.set_item(&self.key, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{Price, Product};

    use super::*;
    use crate::catalog::FixtureCatalog;
    use crate::storage::MemoryStorage;

    const KEY: &str = "@RocketShoes:cart";

    fn shoe(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Shoe {id}"),
            price: Price::from_cents(17990),
            image: format!("https://cdn.example.com/tenis{id}.jpg"),
        }
    }

    fn catalog() -> FixtureCatalog {
        FixtureCatalog::default()
            .with_product(shoe(1), 3)
            .with_product(shoe(2), 1)
    }

    async fn store() -> CartStore<FixtureCatalog, MemoryStorage> {
        CartStore::load(catalog(), MemoryStorage::new(), KEY).await.unwrap()
    }

    fn persisted(store: &CartStore<FixtureCatalog, MemoryStorage>) -> Option<Cart> {
        store
            .storage()
            .peek(KEY)
            .map(|raw| Cart::from_json(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_load_empty_slot() {
        let store = store().await;
        assert!(store.snapshot().await.is_empty());
        assert!(persisted(&store).is_none());
    }

    #[tokio::test]
    async fn test_load_unreadable_slot_starts_empty() {
        let storage = MemoryStorage::with_item(KEY, "{not json");
        let store = CartStore::load(catalog(), storage, KEY).await.unwrap();
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_new_then_increment() {
        let store = store().await;

        let outcome = store.add_product(ProductId::new(1)).await.unwrap();
        assert!(outcome.is_updated());
        assert_eq!(outcome.cart().amount_of(ProductId::new(1)), 1);

        let outcome = store.add_product(ProductId::new(1)).await.unwrap();
        assert_eq!(outcome.cart().amount_of(ProductId::new(1)), 2);
        assert_eq!(outcome.cart().items().len(), 1);

        assert_eq!(persisted(&store).unwrap(), store.snapshot().await);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let store = store().await;
        store.add_product(ProductId::new(2)).await.unwrap();

        let err = store.add_product(ProductId::new(2)).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::OutOfStock {
                requested: 2,
                available: 1,
                ..
            }
        ));
        assert_eq!(store.snapshot().await.amount_of(ProductId::new(2)), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_catalog_error() {
        let store = store().await;
        let err = store.add_product(ProductId::new(42)).await.unwrap_err();
        assert!(matches!(err, CartError::Catalog(_)));
        assert!(err.is_transient());
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store().await;
        store.add_product(ProductId::new(1)).await.unwrap();
        store.add_product(ProductId::new(2)).await.unwrap();

        let outcome = store.remove_product(ProductId::new(1)).await.unwrap();
        assert!(!outcome.cart().contains(ProductId::new(1)));
        assert!(outcome.cart().contains(ProductId::new(2)));
        assert_eq!(persisted(&store).unwrap(), outcome.into_cart());

        let err = store.remove_product(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CartError::NotInCart(id) if id == ProductId::new(1)));
    }

    #[tokio::test]
    async fn test_update_amount() {
        let store = store().await;
        store.add_product(ProductId::new(1)).await.unwrap();

        let outcome = store
            .update_product_amount(ProductId::new(1), 3)
            .await
            .unwrap();
        assert_eq!(outcome.cart().amount_of(ProductId::new(1)), 3);
        assert_eq!(persisted(&store).unwrap().amount_of(ProductId::new(1)), 3);
    }

    #[tokio::test]
    async fn test_update_non_positive_is_ignored() {
        let store = store().await;
        store.add_product(ProductId::new(1)).await.unwrap();

        for amount in [0, -1, i64::MIN] {
            let outcome = store
                .update_product_amount(ProductId::new(1), amount)
                .await
                .unwrap();
            assert!(!outcome.is_updated());
            assert_eq!(outcome.cart().amount_of(ProductId::new(1)), 1);
        }
    }

    #[tokio::test]
    async fn test_update_beyond_stock_and_missing_item() {
        let store = store().await;
        store.add_product(ProductId::new(1)).await.unwrap();

        let err = store
            .update_product_amount(ProductId::new(1), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { .. }));

        let err = store
            .update_product_amount(ProductId::new(1), i64::MAX)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { requested: u32::MAX, .. }));

        let err = store
            .update_product_amount(ProductId::new(2), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::NotInCart(_)));

        assert_eq!(store.snapshot().await.amount_of(ProductId::new(1)), 1);
        assert!(!store.snapshot().await.contains(ProductId::new(2)));
    }
}
