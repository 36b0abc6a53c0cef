//! Remote-first writes with a local fallback.
//!
//! [`SyncCoordinator`] is the only place that decides between the backend
//! and the local store.  Transport failures stop here and become a fallback
//! path; callers see either a result tagged with the tier that produced it
//! or a [`ClientError`](crate::error::ClientError) once every tier is
//! exhausted.

mod auth;
mod orders;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use tienda_net::RemoteGateway;
use tienda_shared::SyncTier;
use tienda_store::{Order, OrderItem, SessionStore, StoreHandle};

use crate::error::Result;
use crate::events::EventBus;

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutcome {
    pub user_id: i64,
    pub name: Option<String>,
    pub tier: SyncTier,
    pub message: String,
}

/// Result of placing an order.  The local copy always exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub tier: SyncTier,
    /// Id assigned by the backend when the remote call succeeded.
    pub remote_id: Option<i64>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Orders for one user and where they were read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    pub orders: Vec<OrderSummary>,
    pub tier: SyncTier,
}

pub struct SyncCoordinator {
    store: StoreHandle,
    gateway: Arc<dyn RemoteGateway>,
    session: SessionStore,
    session_tx: watch::Sender<Option<i64>>,
    events: EventBus,
}

impl SyncCoordinator {
    /// Build a coordinator, restoring any session persisted by a previous
    /// run.  An unreadable session file counts as logged out.
    pub fn new(
        store: StoreHandle,
        gateway: Arc<dyn RemoteGateway>,
        session: SessionStore,
        events: EventBus,
    ) -> Self {
        let restored = match session.current_user_id() {
            Ok(user_id) => user_id,
            Err(e) => {
                warn!(path = %session.path().display(), error = %e, "session unreadable, starting logged out");
                None
            }
        };
        debug!(user_id = ?restored, "session restored");

        let (session_tx, _) = watch::channel(restored);
        Self {
            store,
            gateway,
            session,
            session_tx,
            events,
        }
    }

    /// The logged-in user, if any.
    pub fn current_user_id(&self) -> Option<i64> {
        *self.session_tx.borrow()
    }

    /// Observe login and logout.
    pub fn session(&self) -> watch::Receiver<Option<i64>> {
        self.session_tx.subscribe()
    }

    fn set_session(&self, user_id: i64) -> Result<()> {
        self.session.set_current_user_id(user_id)?;
        self.session_tx.send_replace(Some(user_id));
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        self.session.clear()?;
        self.session_tx.send_replace(None);
        Ok(())
    }
}
