//! Integration tests for the cart store.
//!
//! These drive [`CartStore`] through the public API with in-memory doubles
//! and check both the in-memory cart and the persisted slot.

use std::sync::Arc;

use rocketshoes_core::ProductId;
use rocketshoes_integration_tests::{
    CART_KEY, FlakyStorage, ScriptedCatalog, fixture_catalog, shoe,
};
use rocketshoes_storefront::cart::{
    Cart, CartError, CartItem, CartOperation, CartStore, Notice,
};
use rocketshoes_storefront::storage::{CartStorage, FileStorage, MemoryStorage};

type Store = CartStore<ScriptedCatalog, FlakyStorage>;

async fn store() -> Store {
    CartStore::load(ScriptedCatalog::new(fixture_catalog()), FlakyStorage::new(), CART_KEY)
        .await
        .expect("load empty cart")
}

/// The persisted slot parsed back into a cart.
fn persisted(store: &Store) -> Cart {
    let raw = store.storage().persisted().expect("cart was persisted");
    Cart::from_json(&raw).expect("persisted cart parses")
}

const fn id(n: i32) -> ProductId {
    ProductId::new(n)
}

// =============================================================================
// Add
// =============================================================================

#[tokio::test]
async fn test_add_new_product_appends_one_unit() {
    let store = store().await;

    let outcome = store.add_product(id(1)).await.expect("add");

    let cart = outcome.cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.amount_of(id(1)), 1);
    assert_eq!(cart.get(id(1)).map(|i| i.product.title.as_str()), Some("Tênis 1"));
    assert_eq!(persisted(&store), *cart);
}

#[tokio::test]
async fn test_add_existing_product_increments() {
    let store = store().await;
    store.add_product(id(1)).await.expect("first add");
    store.add_product(id(2)).await.expect("other product");

    let outcome = store.add_product(id(1)).await.expect("second add");

    assert_eq!(outcome.cart().amount_of(id(1)), 2);
    assert_eq!(outcome.cart().items().len(), 2);
    // Insertion order is kept
    assert_eq!(outcome.cart().items()[0].id(), id(1));
}

#[tokio::test]
async fn test_add_beyond_stock_leaves_cart_unchanged() {
    let store = store().await;
    store.add_product(id(2)).await.expect("only unit in stock");
    let before = persisted(&store);

    let err = store.add_product(id(2)).await.expect_err("no second unit");

    assert_eq!(Notice::for_failure(CartOperation::Add, &err), Notice::OutOfStock);
    assert_eq!(store.snapshot().await, before);
    assert_eq!(persisted(&store), before);
}

#[tokio::test]
async fn test_add_sold_out_product() {
    let store = store().await;

    let err = store.add_product(id(3)).await.expect_err("sold out");

    assert!(matches!(err, CartError::OutOfStock { requested: 1, available: 0, .. }));
    assert!(store.snapshot().await.is_empty());
    assert!(store.storage().persisted().is_none());
}

#[tokio::test]
async fn test_add_with_catalog_failure_reports_add_failed() {
    let store = store().await;
    store.catalog().fail_product(true);

    let err = store.add_product(id(1)).await.expect_err("product lookup fails");

    assert!(err.is_transient());
    assert_eq!(Notice::for_failure(CartOperation::Add, &err), Notice::AddFailed);
    assert!(store.snapshot().await.is_empty());

    store.catalog().fail_product(false);
    store.catalog().fail_stock(true);
    let err = store.add_product(id(1)).await.expect_err("stock lookup fails");
    assert_eq!(Notice::for_failure(CartOperation::Add, &err), Notice::AddFailed);
}

// =============================================================================
// Remove
// =============================================================================

#[tokio::test]
async fn test_remove_deletes_exactly_that_entry() {
    let store = store().await;
    store.add_product(id(1)).await.expect("add 1");
    store.add_product(id(2)).await.expect("add 2");

    let outcome = store.remove_product(id(1)).await.expect("remove");

    assert!(!outcome.cart().contains(id(1)));
    assert_eq!(outcome.cart().amount_of(id(2)), 1);
    assert_eq!(persisted(&store), *outcome.cart());
}

#[tokio::test]
async fn test_remove_absent_product_reports_remove_failed() {
    let store = store().await;
    store.add_product(id(1)).await.expect("add");
    let calls_before = store.catalog().stock_calls();

    let err = store.remove_product(id(2)).await.expect_err("not in cart");

    assert!(matches!(err, CartError::NotInCart(p) if p == id(2)));
    assert_eq!(Notice::for_failure(CartOperation::Remove, &err), Notice::RemoveFailed);
    assert_eq!(store.snapshot().await.amount_of(id(1)), 1);
    // Removing never consults the catalog
    assert_eq!(store.catalog().stock_calls(), calls_before);
}

// =============================================================================
// Update amount
// =============================================================================

#[tokio::test]
async fn test_update_amount_overwrites() {
    let store = store().await;
    store.add_product(id(1)).await.expect("add");

    let outcome = store.update_product_amount(id(1), 3).await.expect("update");

    assert_eq!(outcome.cart().amount_of(id(1)), 3);
    assert_eq!(persisted(&store).amount_of(id(1)), 3);

    let outcome = store.update_product_amount(id(1), 1).await.expect("lower");
    assert_eq!(outcome.cart().amount_of(id(1)), 1);
}

#[tokio::test]
async fn test_update_non_positive_amount_is_silently_ignored() {
    let store = store().await;
    store.add_product(id(1)).await.expect("add");
    let calls_before = store.catalog().stock_calls();

    for amount in [0, -5] {
        let outcome = store
            .update_product_amount(id(1), amount)
            .await
            .expect("ignored, not an error");
        assert!(!outcome.is_updated());
    }

    assert_eq!(store.snapshot().await.amount_of(id(1)), 1);
    assert_eq!(store.catalog().stock_calls(), calls_before);
}

#[tokio::test]
async fn test_update_above_stock_reports_out_of_stock() {
    let store = store().await;
    store.add_product(id(1)).await.expect("add");

    let err = store
        .update_product_amount(id(1), 4)
        .await
        .expect_err("only 3 in stock");

    assert_eq!(
        Notice::for_failure(CartOperation::UpdateAmount, &err),
        Notice::OutOfStock
    );
    assert_eq!(store.snapshot().await.amount_of(id(1)), 1);
}

#[tokio::test]
async fn test_update_product_not_in_cart_reports_update_failed() {
    let store = store().await;

    let err = store
        .update_product_amount(id(1), 1)
        .await
        .expect_err("not in cart");

    assert!(matches!(err, CartError::NotInCart(_)));
    assert_eq!(
        Notice::for_failure(CartOperation::UpdateAmount, &err),
        Notice::UpdateFailed
    );
    assert!(store.snapshot().await.is_empty());
    assert!(store.storage().persisted().is_none());
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_failed_write_keeps_memory_and_storage_in_step() {
    let store = store().await;
    store.add_product(id(1)).await.expect("add");
    let before = store.snapshot().await;

    store.storage().fail_writes(true);
    let err = store.add_product(id(1)).await.expect_err("write fails");
    assert!(matches!(err, CartError::Storage(_)));
    assert_eq!(store.snapshot().await, before);

    let err = store.add_product(id(2)).await.expect_err("write fails");
    assert_eq!(Notice::for_failure(CartOperation::Add, &err), Notice::AddFailed);
    assert_eq!(store.snapshot().await, before);
    assert_eq!(persisted(&store), before);

    store.storage().fail_writes(false);
    store.add_product(id(1)).await.expect("write recovers");
    assert_eq!(persisted(&store).amount_of(id(1)), 2);
}

#[tokio::test]
async fn test_cart_survives_reload_from_file_storage() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let store = CartStore::load(fixture_catalog(), FileStorage::new(dir.path()), CART_KEY)
            .await
            .expect("load");
        store.add_product(id(1)).await.expect("add 1");
        store.add_product(id(1)).await.expect("add 1 again");
        store.add_product(id(2)).await.expect("add 2");
    }

    let store = CartStore::load(fixture_catalog(), FileStorage::new(dir.path()), CART_KEY)
        .await
        .expect("reload");
    let cart = store.snapshot().await;

    assert_eq!(cart.amount_of(id(1)), 2);
    assert_eq!(cart.amount_of(id(2)), 1);
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn test_persisted_form_matches_stored_layout() {
    let storage = MemoryStorage::new();
    let store = CartStore::load(fixture_catalog(), storage, CART_KEY)
        .await
        .expect("load");
    store.add_product(id(1)).await.expect("add");

    let raw = store
        .storage()
        .get_item(CART_KEY)
        .await
        .expect("read")
        .expect("slot filled");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");

    assert_eq!(
        value,
        serde_json::json!([{
            "id": 1,
            "title": "Tênis 1",
            "price": 179.9,
            "image": "https://cdn.example.com/tenis1.jpg",
            "amount": 1
        }])
    );
}

#[tokio::test]
async fn test_load_existing_slot() {
    let stored = Cart::from_items(vec![CartItem {
        product: shoe(2, 13990),
        amount: 1,
    }]);
    let storage = MemoryStorage::with_item(CART_KEY, &stored.to_json().expect("serialize"));

    let store = CartStore::load(fixture_catalog(), storage, CART_KEY)
        .await
        .expect("load");

    assert_eq!(store.snapshot().await, stored);
    assert_eq!(store.item_count().await, 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_never_exceed_stock() {
    let store = Arc::new(store().await);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.add_product(id(1)).await })
        })
        .collect();

    let mut added = 0;
    let mut out_of_stock = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => added += 1,
            Err(CartError::OutOfStock { .. }) => out_of_stock += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(added, 3);
    assert_eq!(out_of_stock, 7);
    assert_eq!(store.snapshot().await.amount_of(id(1)), 3);
    assert_eq!(persisted(&store).amount_of(id(1)), 3);
}
