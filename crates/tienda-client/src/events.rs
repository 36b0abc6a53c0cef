//! Transient notifications for the UI (snackbars, toasts).
//!
//! Events are fire-and-forget: with no subscriber they are dropped, and a
//! lagging subscriber loses the oldest ones.

use serde::Serialize;
use tokio::sync::broadcast;

pub const MSG_CART_ADDED: &str = "Added to cart";
pub const MSG_CART_REMOVED: &str = "Removed from cart";
pub const MSG_CART_UNDONE: &str = "Removal undone";
pub const MSG_CART_CLEARED: &str = "Cart cleared";
pub const MSG_ORDER_REMOTE: &str = "Order saved to server";
pub const MSG_ORDER_LOCAL: &str = "Order saved locally";
pub const MSG_LOGIN_LOCAL: &str = "Logged in offline";
pub const MSG_LOGIN_FAILED: &str = "Invalid email or password";
pub const MSG_REGISTER_LOCAL: &str = "Account created on this device";
pub const MSG_LOGGED_OUT: &str = "Logged out";

/// Label of the action attached to undoable removals.
pub const ACTION_UNDO: &str = "Undo";

const EVENT_BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Cart,
    Auth,
    Checkout,
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEvent {
    pub message: String,
    /// Label for an action button, e.g. [`ACTION_UNDO`].
    pub action_label: Option<String>,
    pub source: EventSource,
}

impl UiEvent {
    pub fn new(source: EventSource, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action_label: None,
            source,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }
}

/// Cloneable sender side of the UI event stream.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: UiEvent) {
        tracing::debug!(source = ?event.source, message = %event.message, "ui event");
        // Err only means nobody is listening.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
