//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A catalog entry.  Ids are assigned remotely, or offset-shifted for
/// third-party catalogs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Bundled-resource handle, 0 when the product has none.
    pub image_res: i64,
    /// Remote image, preferred over `image_res` when non-blank.
    pub image_url: Option<String>,
}

/// Where the UI should load a product image from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImageSource<'a> {
    Remote(&'a str),
    Bundled(i64),
    None,
}

impl Product {
    pub fn image_source(&self) -> ImageSource<'_> {
        match self.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => ImageSource::Remote(url),
            _ if self.image_res != 0 => ImageSource::Bundled(self.image_res),
            _ => ImageSource::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// A line in the cart.  `price` is the product price at the time it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// A cart line that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl NewCartItem {
    /// A single unit of `product`, snapshotting its current price.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A locally known account, used for offline login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Compared case-sensitively; not unique at the schema level.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// An order header.  Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Sum of price x quantity over the lines, captured at checkout.
    pub total: f64,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// A denormalised order line, independent of the live product row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<&CartItem> for NewOrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// An order ready to be written, header and lines together.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub total: f64,
    pub created_at: i64,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Build an order from cart lines, computing the total once.
    pub fn from_cart(user_id: i64, created_at: i64, lines: &[CartItem]) -> Self {
        Self {
            user_id,
            total: lines.iter().map(CartItem::line_total).sum(),
            created_at,
            items: lines.iter().map(NewOrderItem::from).collect(),
        }
    }
}
