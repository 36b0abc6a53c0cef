//! Read-only client for the third-party product catalog.
//!
//! Products from this source are shifted by
//! [`EXTERNAL_PRODUCT_ID_OFFSET`] so they never collide with first-party ids.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use tienda_shared::constants::EXTERNAL_PRODUCT_ID_OFFSET;
use tienda_store::Product;

use crate::error::{GatewayError, Result};
use crate::http::{parse_base_url, send_json};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExternalProduct {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ExternalProduct {
    pub fn into_product(self) -> Product {
        Product {
            id: self.id + EXTERNAL_PRODUCT_ID_OFFSET,
            name: self.title,
            description: self.description,
            price: self.price,
            image_res: 0,
            image_url: self.thumbnail,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalProductsResponse {
    #[serde(default)]
    pub products: Vec<ExternalProduct>,
    pub total: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ExternalCatalog {
    client: Client,
    base_url: Url,
    limit: usize,
}

impl ExternalCatalog {
    /// `limit` caps how many products [`fetch`](Self::fetch) returns.
    pub fn new(base_url: &str, timeout: Duration, limit: usize) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: parse_base_url(base_url)?,
            limit,
        })
    }

    /// First `limit` products of the catalog, already id-shifted.
    pub async fn fetch(&self) -> Result<Vec<Product>> {
        let url = self
            .base_url
            .join("products")
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        let response: ExternalProductsResponse =
            send_json(self.client.get(url), "external_products").await?;

        let products: Vec<Product> = response
            .products
            .into_iter()
            .take(self.limit)
            .map(ExternalProduct::into_product)
            .collect();

        tracing::debug!(
            count = products.len(),
            total = ?response.total,
            "fetched external catalog"
        );
        Ok(products)
    }
}
