//! [`RemoteGateway`] over the backend's JSON HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::gateway::RemoteGateway;
use crate::models::{
    AuthResponse, CreateOrderRequest, ErrorResponse, LoginRequest, OrderResponse,
    ProductResponse, RegisterRequest,
};

/// reqwest-backed gateway rooted at the backend base URL.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Build a gateway for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let url = self.endpoint("api/auth/login")?;
        send_json(self.client.post(url).json(request), "login").await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let url = self.endpoint("api/auth/register")?;
        send_json(self.client.post(url).json(request), "register").await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse> {
        let url = self.endpoint("api/orders")?;
        send_json(self.client.post(url).json(request), "create_order").await
    }

    async fn list_products(&self) -> Result<Vec<ProductResponse>> {
        let url = self.endpoint("api/products")?;
        send_json(self.client.get(url), "list_products").await
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderResponse>> {
        let url = self.endpoint(&format!("api/orders/{user_id}"))?;
        send_json(self.client.get(url), "orders_for_user").await
    }
}

/// Parse a base URL, making sure relative joins append to its path.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let normalised = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalised).map_err(|e| GatewayError::InvalidUrl(e.to_string()))
}

/// Send `request` and decode a success body as `T`.
///
/// Non-success statuses become [`GatewayError::Status`], carrying the
/// backend's `{"error": ...}` message when there is one.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    endpoint: &'static str,
) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        debug!(endpoint, status = status.as_u16(), "remote rejected request");
        return Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        });
    }

    debug!(endpoint, status = status.as_u16(), "remote request succeeded");
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://10.0.2.2:8080/shop").unwrap();
        assert_eq!(
            url.join("api/orders").unwrap().as_str(),
            "http://10.0.2.2:8080/shop/api/orders"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpGateway::new("not a url", Duration::from_secs(1)),
            Err(GatewayError::InvalidUrl(_))
        ));
    }
}
