// Remote access for the shopping client: the backend API and the
// third-party catalog, both over HTTP.

pub mod error;
pub mod external;
pub mod gateway;
pub mod http;
pub mod models;

pub use error::{GatewayError, Result};
pub use external::ExternalCatalog;
pub use gateway::RemoteGateway;
pub use http::HttpGateway;
pub use models::{
    AuthResponse, CreateOrderItemRequest, CreateOrderRequest, LoginRequest, OrderItemResponse,
    OrderResponse, ProductResponse, RegisterRequest,
};
