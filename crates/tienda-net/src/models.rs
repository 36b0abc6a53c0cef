//! JSON bodies exchanged with the backend.
//!
//! Field names follow the backend's camelCase contract.

use std::fmt;

use serde::{Deserialize, Serialize};
use tienda_store::{NewOrder, Order, OrderItem, Product};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Debug output never includes the password.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub id: i64,
    /// Not every backend echoes the email back.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub total: f64,
    pub created_at: i64,
    pub items: Vec<CreateOrderItemRequest>,
}

impl From<&NewOrder> for CreateOrderRequest {
    fn from(order: &NewOrder) -> Self {
        Self {
            user_id: order.user_id,
            total: order.total,
            created_at: order.created_at,
            items: order
                .items
                .iter()
                .map(|item| CreateOrderItemRequest {
                    product_name: item.product_name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub total: f64,
    pub created_at: i64,
    #[serde(default)]
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    /// Split into the header and lines used by the local model.
    pub fn into_order(self) -> (Order, Vec<OrderItem>) {
        let order = Order {
            id: self.id,
            user_id: self.user_id,
            total: self.total,
            created_at: self.created_at,
        };
        let items = self
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: item.id,
                order_id: self.id,
                product_name: item.product_name,
                price: item.price,
                quantity: item.quantity,
            })
            .collect();
        (order, items)
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ProductResponse {
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            image_res: 0,
            image_url: self.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tienda_store::CartItem;

    #[test]
    fn create_order_body_uses_camel_case() {
        let order = NewOrder::from_cart(
            3,
            1_700_000_000_000,
            &[CartItem {
                id: 1,
                product_id: 9,
                name: "Mochila".into(),
                price: 39.99,
                quantity: 2,
            }],
        );
        let json = serde_json::to_value(CreateOrderRequest::from(&order)).unwrap();

        assert_eq!(json["userId"], 3);
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert_eq!(json["items"][0]["productName"], "Mochila");
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn auth_response_tolerates_missing_name() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"id":5,"email":"a@b.c","message":"ok"}"#).unwrap();
        assert_eq!(auth.id, 5);
        assert_eq!(auth.name, None);
        assert_eq!(auth.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn auth_response_without_email_decodes() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"id":77,"name":"Ana","message":"ok"}"#).unwrap();
        assert_eq!(auth.id, 77);
        assert_eq!(auth.email, None);
        assert_eq!(auth.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn request_debug_hides_password() {
        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn order_response_splits_lines() {
        let resp: OrderResponse = serde_json::from_str(
            r#"{"id":8,"userId":2,"total":12.99,"createdAt":10,
                "items":[{"id":1,"productName":"Taza","price":12.99,"quantity":1}]}"#,
        )
        .unwrap();
        let (order, items) = resp.into_order();
        assert_eq!(order.id, 8);
        assert_eq!(items[0].order_id, 8);
        assert_eq!(items[0].product_name, "Taza");
    }
}
