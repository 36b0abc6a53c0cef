use tracing::{info, warn};

use tienda_net::models::CreateOrderRequest;
use tienda_shared::SyncTier;
use tienda_store::{CartItem, NewOrder, OrderItem};

use super::{OrderHistory, OrderReceipt, OrderSummary, SyncCoordinator};
use crate::error::{ClientError, Result};
use crate::events::{EventSource, UiEvent, MSG_ORDER_LOCAL, MSG_ORDER_REMOTE};

/// Owner recorded for orders placed without a session.
const ANONYMOUS_USER_ID: i64 = 0;

impl SyncCoordinator {
    /// Place an order for `lines`.
    ///
    /// The remote call is attempted once and the order is always written
    /// locally, header and lines in one transaction.  Only a local write
    /// failure is an error; the receipt says whether the server has a copy.
    pub async fn place_order(&self, lines: &[CartItem]) -> Result<OrderReceipt> {
        if lines.is_empty() {
            return Err(ClientError::Validation("cannot place an empty order".into()));
        }

        let user_id = self.current_user_id().unwrap_or(ANONYMOUS_USER_ID);
        let created_at = chrono::Utc::now().timestamp_millis();
        let order = NewOrder::from_cart(user_id, created_at, lines);

        let remote_id = match self
            .gateway
            .create_order(&CreateOrderRequest::from(&order))
            .await
        {
            Ok(created) => Some(created.id),
            Err(e) => {
                warn!(user_id, error = %e, "remote order failed, keeping local copy only");
                None
            }
        };

        let (saved, items) = self
            .store
            .call(move |db| {
                let saved = db.create_order(&order)?;
                let items = db.get_order_items(saved.id)?;
                Ok((saved, items))
            })
            .await?;

        let (tier, message) = match remote_id {
            Some(_) => (SyncTier::Remote, MSG_ORDER_REMOTE),
            None => (SyncTier::Local, MSG_ORDER_LOCAL),
        };
        info!(
            order_id = saved.id,
            remote_id = ?remote_id,
            lines = items.len(),
            total = saved.total,
            tier = %tier,
            "order placed"
        );
        self.events
            .emit(UiEvent::new(EventSource::Checkout, message));

        Ok(OrderReceipt {
            order: saved,
            items,
            tier,
            remote_id,
            message: message.to_string(),
        })
    }

    /// Orders placed by `user_id`, from the server when reachable, otherwise
    /// from the local store (newest first).
    pub async fn order_history(&self, user_id: i64) -> Result<OrderHistory> {
        match self.gateway.orders_for_user(user_id).await {
            Ok(remote) => {
                let orders = remote
                    .into_iter()
                    .map(|resp| {
                        let (order, items) = resp.into_order();
                        OrderSummary { order, items }
                    })
                    .collect();
                Ok(OrderHistory {
                    orders,
                    tier: SyncTier::Remote,
                })
            }
            Err(e) => {
                warn!(user_id, error = %e, "remote order history failed, reading local orders");
                let orders = self
                    .store
                    .call(move |db| {
                        let mut summaries = Vec::new();
                        for order in db.list_orders_for_user(user_id)? {
                            let items = db.get_order_items(order.id)?;
                            summaries.push(OrderSummary { order, items });
                        }
                        Ok(summaries)
                    })
                    .await?;
                Ok(OrderHistory {
                    orders,
                    tier: SyncTier::Local,
                })
            }
        }
    }

    /// Lines of a locally stored order.
    pub async fn order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        Ok(self
            .store
            .call(move |db| db.get_order_items(order_id))
            .await?)
    }
}
