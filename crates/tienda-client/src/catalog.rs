//! Product catalog: remote refresh into the local table, local search, and
//! the mixed first-party/third-party listing.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::watch;
use tracing::{info, warn};

use tienda_net::{ExternalCatalog, RemoteGateway};
use tienda_shared::SyncTier;
use tienda_store::{Product, StoreHandle};

use crate::error::Result;

pub struct CatalogService {
    store: StoreHandle,
    gateway: Arc<dyn RemoteGateway>,
    external: Option<ExternalCatalog>,
    products_tx: watch::Sender<Vec<Product>>,
}

impl CatalogService {
    /// Start with the locally stored catalog already published.
    pub async fn new(
        store: StoreHandle,
        gateway: Arc<dyn RemoteGateway>,
        external: Option<ExternalCatalog>,
    ) -> Result<Self> {
        let local = store.call(|db| db.list_products()).await?;
        let (products_tx, _) = watch::channel(local);
        Ok(Self {
            store,
            gateway,
            external,
            products_tx,
        })
    }

    /// Observe the first-party catalog.  New receivers start with the latest
    /// list.
    pub fn products(&self) -> watch::Receiver<Vec<Product>> {
        self.products_tx.subscribe()
    }

    /// Pull the remote catalog into the local table, then publish the local
    /// table.  A remote failure publishes the local catalog unchanged.
    pub async fn refresh(&self) -> Result<(Vec<Product>, SyncTier)> {
        let tier = match self.gateway.list_products().await {
            Ok(remote) => {
                let products: Vec<Product> =
                    remote.into_iter().map(|p| p.into_product()).collect();
                let written = self
                    .store
                    .call(move |db| db.upsert_products(&products))
                    .await?;
                info!(count = written, "catalog refreshed from server");
                SyncTier::Remote
            }
            Err(e) => {
                warn!(error = %e, "catalog refresh failed, using local catalog");
                SyncTier::Local
            }
        };

        let products = self.store.call(|db| db.list_products()).await?;
        self.products_tx.send_replace(products.clone());
        Ok((products, tier))
    }

    /// Local products whose name or description contains `query`, ignoring
    /// ASCII case.  A blank query returns everything.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Ok(self.store.call(|db| db.list_products()).await?);
        }
        Ok(self.store.call(move |db| db.search_products(&query)).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.store.call(move |db| db.get_product(id)).await?)
    }

    /// Third-party products, id-shifted.  Empty when no external catalog is
    /// configured.
    pub async fn fetch_external(&self) -> Result<Vec<Product>> {
        match &self.external {
            Some(external) => Ok(external.fetch().await?),
            None => Ok(Vec::new()),
        }
    }

    /// Up to `count` products from both catalogs in random order.  The
    /// third-party catalog is optional: when it fails, only local products
    /// are mixed.
    pub async fn recommended(&self, count: usize) -> Result<Vec<Product>> {
        let mut mixed = self.store.call(|db| db.list_products()).await?;

        match self.fetch_external().await {
            Ok(external) => mixed.extend(external),
            Err(e) => warn!(error = %e, "external catalog unavailable"),
        }

        mixed.shuffle(&mut rand::thread_rng());
        mixed.truncate(count);
        Ok(mixed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use tienda_net::models::{
        AuthResponse, CreateOrderRequest, LoginRequest, OrderResponse, ProductResponse,
        RegisterRequest,
    };
    use tienda_net::GatewayError;
    use tienda_store::{seed, Database};

    use super::*;

    struct ProductsGateway(Option<Vec<ProductResponse>>);

    impl ProductsGateway {
        fn fail<T>() -> tienda_net::Result<T> {
            Err(GatewayError::Status {
                status: 503,
                message: "down".into(),
            })
        }
    }

    #[async_trait]
    impl RemoteGateway for ProductsGateway {
        async fn login(&self, _: &LoginRequest) -> tienda_net::Result<AuthResponse> {
            Self::fail()
        }
        async fn register(&self, _: &RegisterRequest) -> tienda_net::Result<AuthResponse> {
            Self::fail()
        }
        async fn create_order(&self, _: &CreateOrderRequest) -> tienda_net::Result<OrderResponse> {
            Self::fail()
        }
        async fn list_products(&self) -> tienda_net::Result<Vec<ProductResponse>> {
            match &self.0 {
                Some(products) => Ok(products.clone()),
                None => Self::fail(),
            }
        }
        async fn orders_for_user(&self, _: i64) -> tienda_net::Result<Vec<OrderResponse>> {
            Self::fail()
        }
    }

    fn seeded_store() -> StoreHandle {
        let mut db = Database::open_in_memory().unwrap();
        db.upsert_products(&seed::default_catalog()).unwrap();
        StoreHandle::new(db)
    }

    fn remote_product(id: i64, name: &str, price: f64) -> ProductResponse {
        ProductResponse {
            id,
            name: name.into(),
            description: "remote".into(),
            price,
            image_url: None,
            stock: 3,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn refresh_upserts_remote_products() {
        let gateway = ProductsGateway(Some(vec![
            remote_product(1, "Cafetera", 55.0),
            remote_product(9, "Lámpara", 20.0),
        ]));
        let catalog = CatalogService::new(seeded_store(), Arc::new(gateway), None)
            .await
            .unwrap();
        let mut rx = catalog.products();

        let (products, tier) = catalog.refresh().await.unwrap();
        assert_eq!(tier, SyncTier::Remote);
        assert_eq!(products.len(), 5);
        assert_eq!(catalog.get(1).await.unwrap().unwrap().price, 55.0);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 5);
    }

    #[tokio::test]
    async fn refresh_failure_publishes_local_catalog() {
        let catalog = CatalogService::new(seeded_store(), Arc::new(ProductsGateway(None)), None)
            .await
            .unwrap();

        let (products, tier) = catalog.refresh().await.unwrap();
        assert_eq!(tier, SyncTier::Local);
        assert_eq!(products.len(), 4);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let catalog = CatalogService::new(seeded_store(), Arc::new(ProductsGateway(None)), None)
            .await
            .unwrap();

        let hits = catalog.search("MOCHILA").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);
        assert_eq!(catalog.search("  ").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn recommended_without_external_uses_local_only() {
        let catalog = CatalogService::new(seeded_store(), Arc::new(ProductsGateway(None)), None)
            .await
            .unwrap();

        let picks = catalog.recommended(3).await.unwrap();
        assert_eq!(picks.len(), 3);
        let ids: HashSet<i64> = picks.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| (1..=4).contains(id)));
    }
}
