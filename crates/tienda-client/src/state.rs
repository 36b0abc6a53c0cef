//! Application state shared by every UI entry point.
//!
//! [`AppState`] wires the store, the gateways and the services together.
//! Each service owns a clone of the same [`StoreHandle`].

use std::sync::Arc;

use tracing::{info, warn};

use tienda_net::{ExternalCatalog, HttpGateway, RemoteGateway};
use tienda_store::{get_or_create_instance, SessionStore, StoreError, StoreHandle};

use crate::cart::CartManager;
use crate::catalog::CatalogService;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::EventBus;
use crate::sync::{OrderReceipt, SyncCoordinator};

pub struct AppState {
    pub config: ClientConfig,
    pub store: StoreHandle,
    pub sync: SyncCoordinator,
    pub cart: CartManager,
    pub catalog: CatalogService,
    pub events: EventBus,
}

impl AppState {
    /// Open the process-wide database and connect to the configured
    /// backend and third-party catalog.
    pub async fn bootstrap(config: ClientConfig) -> Result<Self> {
        let db_path = config.database_path()?;
        info!(path = %db_path.display(), api = %config.api_base_url, "bootstrapping client");

        let store = tokio::task::spawn_blocking(move || get_or_create_instance(&db_path))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;

        let gateway = HttpGateway::new(&config.api_base_url, config.http_timeout)?;
        let external = match ExternalCatalog::new(
            &config.external_catalog_url,
            config.http_timeout,
            config.external_catalog_limit,
        ) {
            Ok(external) => Some(external),
            Err(e) => {
                warn!(error = %e, "external catalog disabled");
                None
            }
        };

        Self::with_parts(config, store, Arc::new(gateway), external).await
    }

    /// Assemble the services over an already opened store.
    pub async fn with_parts(
        config: ClientConfig,
        store: StoreHandle,
        gateway: Arc<dyn RemoteGateway>,
        external: Option<ExternalCatalog>,
    ) -> Result<Self> {
        let events = EventBus::new();
        let session = SessionStore::at(config.session_path()?);

        let sync = SyncCoordinator::new(store.clone(), Arc::clone(&gateway), session, events.clone());
        let cart = CartManager::spawn(store.clone(), events.clone()).await?;
        let catalog = CatalogService::new(store.clone(), gateway, external).await?;

        Ok(Self {
            config,
            store,
            sync,
            cart,
            catalog,
            events,
        })
    }

    /// Turn the current cart into an order, then take the ordered lines out
    /// of the cart once the local copy is stored.  Lines added while the
    /// order was in flight stay in the cart.
    pub async fn checkout(&self) -> Result<OrderReceipt> {
        let lines = self.cart.snapshot().await?;
        if lines.is_empty() {
            return Err(ClientError::Validation("cart is empty".into()));
        }

        let receipt = self.sync.place_order(&lines).await?;

        if let Err(e) = self.cart.settle(&lines).await {
            warn!(order_id = receipt.order.id, error = %e, "order stored but cart not settled");
        }
        Ok(receipt)
    }
}
