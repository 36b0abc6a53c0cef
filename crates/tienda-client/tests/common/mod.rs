#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tienda_client::{EventBus, SyncCoordinator};
use tienda_net::models::{
    AuthResponse, CreateOrderRequest, LoginRequest, OrderResponse, ProductResponse,
    RegisterRequest,
};
use tienda_net::{GatewayError, RemoteGateway, Result};
use tienda_store::{seed, Database, SessionStore, StoreHandle};
use tokio::sync::Notify;

/// How the fake backend answers every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AlwaysFail,
    AlwaysSucceed,
}

/// Fake backend that records the calls it receives.
pub struct FakeGateway {
    mode: Mode,
    pub remote_user_id: i64,
    pub calls: Mutex<Vec<&'static str>>,
    pub orders: Mutex<Vec<CreateOrderRequest>>,
}

impl FakeGateway {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            remote_user_id: 500,
            calls: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.mode {
            Mode::AlwaysSucceed => Ok(()),
            Mode::AlwaysFail => Err(GatewayError::Status {
                status: 503,
                message: "service unavailable".into(),
            }),
        }
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.record("login")?;
        Ok(AuthResponse {
            id: self.remote_user_id,
            email: Some(request.email.clone()),
            name: Some("Remote Ana".into()),
            message: "Login successful".into(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.record("register")?;
        Ok(AuthResponse {
            id: self.remote_user_id,
            email: Some(request.email.clone()),
            name: Some(request.name.clone()),
            message: "User registered".into(),
        })
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse> {
        self.record("create_order")?;
        self.orders.lock().unwrap().push(request.clone());
        Ok(OrderResponse {
            id: 9_000,
            user_id: request.user_id,
            total: request.total,
            created_at: request.created_at,
            items: Vec::new(),
        })
    }

    async fn list_products(&self) -> Result<Vec<ProductResponse>> {
        self.record("list_products")?;
        Ok(Vec::new())
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderResponse>> {
        self.record("orders_for_user")?;
        Ok(vec![OrderResponse {
            id: 77,
            user_id,
            total: 12.99,
            created_at: 1,
            items: Vec::new(),
        }])
    }
}

/// Backend whose `create_order` parks until released, so a test can act
/// while an order is in flight.
pub struct HoldingGateway {
    pub inner: Arc<FakeGateway>,
    pub entered: Notify,
    pub release: Notify,
}

impl HoldingGateway {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            inner: FakeGateway::new(mode),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl RemoteGateway for HoldingGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        self.inner.login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        self.inner.register(request).await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.create_order(request).await
    }

    async fn list_products(&self) -> Result<Vec<ProductResponse>> {
        self.inner.list_products().await
    }

    async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderResponse>> {
        self.inner.orders_for_user(user_id).await
    }
}

/// In-memory database with the launch catalog and demo account.
pub fn seeded_store() -> StoreHandle {
    let mut db = Database::open_in_memory().unwrap();
    seed::try_seed(&mut db).unwrap();
    StoreHandle::new(db)
}

pub fn coordinator(store: &StoreHandle, gateway: Arc<FakeGateway>, dir: &Path) -> SyncCoordinator {
    SyncCoordinator::new(
        store.clone(),
        gateway,
        SessionStore::open(dir),
        EventBus::new(),
    )
}
