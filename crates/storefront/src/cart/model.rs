//! Cart contents.

use rocketshoes_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize, Serializer};

/// One product in the cart.
///
/// Serialized flat, the catalog record plus `amount`:
/// `{ "id": 1, "title": "...", "price": 179.9, "image": "...", "amount": 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Units in the cart; always at least 1 while the item is present.
    pub amount: u32,
}

impl CartItem {
    /// A fresh cart line holding one unit of `product`.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// Ordered list of cart items, unique by product id.
///
/// Deserializing goes through [`Cart::from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from stored items.
    ///
    /// Repeated ids keep their first occurrence and zero-amount items are
    /// dropped, so the result always satisfies the cart invariants.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.amount == 0 {
                tracing::warn!(product_id = %item.id(), "Dropping stored cart item with zero amount");
            } else if cart.contains(item.id()) {
                tracing::warn!(product_id = %item.id(), "Dropping duplicate stored cart item");
            } else {
                cart.items.push(item);
            }
        }
        cart
    }

    /// Parse the persisted form.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON array of cart items.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The persisted form: a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Units of `id` in the cart, 0 if absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |item| item.amount)
    }

    /// Total units across all items (the cart badge count), capped at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.amount))
    }

    /// Sum of all line totals, saturating like [`Price`] arithmetic.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Append a new item. The caller guarantees the id is not yet present.
    pub(crate) fn push(&mut self, item: CartItem) {
        debug_assert!(!self.contains(item.id()));
        self.items.push(item);
    }

    /// Remove the item with `id`, returning it if it was present.
    pub(crate) fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}
