use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AuthResponse, CreateOrderRequest, LoginRequest, OrderResponse, ProductResponse,
    RegisterRequest,
};

/// The backend as seen by the synchronisation layer.
///
/// Implementations are stateless request/response clients.  They report
/// every failure and never fall back on their own; retry and fallback policy
/// belongs to the caller.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse>;

    async fn list_products(&self) -> Result<Vec<ProductResponse>>;

    /// Orders previously placed by `user_id`.
    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderResponse>>;
}
