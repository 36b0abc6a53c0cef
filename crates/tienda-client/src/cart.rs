//! The live cart: a single-writer actor over the `cart_items` table.
//!
//! Every mutation is a command on one mpsc channel, so operations complete
//! in the order they were issued and never interleave.  The actor owns the
//! one-slot undo buffer and republishes the full line list after each
//! mutation.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use tienda_store::{CartItem, NewCartItem, Product, StoreError, StoreHandle};

use crate::error::{ClientError, Result};
use crate::events::{
    EventBus, EventSource, UiEvent, ACTION_UNDO, MSG_CART_ADDED, MSG_CART_CLEARED,
    MSG_CART_REMOVED, MSG_CART_UNDONE,
};

const COMMAND_BUFFER: usize = 64;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

type Reply<T> = oneshot::Sender<Result<T>>;

#[derive(Debug)]
enum CartCommand {
    Add {
        product: Product,
        reply: Reply<CartItem>,
    },
    ChangeQuantity {
        product_id: i64,
        delta: i64,
        reply: Reply<Option<CartItem>>,
    },
    Remove {
        line_id: i64,
        reply: Reply<Option<CartItem>>,
    },
    UndoLastRemoved {
        reply: Reply<Option<CartItem>>,
    },
    Clear {
        reply: Reply<usize>,
    },
    Settle {
        lines: Vec<CartItem>,
        reply: Reply<usize>,
    },
    Snapshot {
        reply: Reply<Vec<CartItem>>,
    },
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cloneable handle to the cart actor.
#[derive(Debug, Clone)]
pub struct CartManager {
    cmd_tx: mpsc::Sender<CartCommand>,
    items_rx: watch::Receiver<Vec<CartItem>>,
}

impl CartManager {
    /// Load the persisted cart and start the actor task.
    pub async fn spawn(store: StoreHandle, events: EventBus) -> Result<Self> {
        let initial = store.call(|db| db.list_cart_items()).await?;
        let (items_tx, items_rx) = watch::channel(initial);
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

        let actor = CartActor {
            store,
            events,
            items_tx,
            last_removed: None,
        };
        tokio::spawn(actor.run(cmd_rx));

        Ok(Self { cmd_tx, items_rx })
    }

    /// Add one unit of `product`, merging into an existing line.
    pub async fn add(&self, product: &Product) -> Result<CartItem> {
        let product = product.clone();
        self.request(|reply| CartCommand::Add { product, reply }).await
    }

    /// Adjust the line for `product_id` by `delta`.  Reaching zero removes
    /// the line through the undoable path.  Returns the updated line, or
    /// `None` if the line is gone or never existed.
    pub async fn change_quantity(&self, product_id: i64, delta: i64) -> Result<Option<CartItem>> {
        self.request(|reply| CartCommand::ChangeQuantity {
            product_id,
            delta,
            reply,
        })
        .await
    }

    /// Delete `line` and keep it as the undo slot.  Returns the removed row,
    /// or `None` if it was already gone.
    pub async fn remove(&self, line: &CartItem) -> Result<Option<CartItem>> {
        let line_id = line.id;
        self.request(|reply| CartCommand::Remove { line_id, reply })
            .await
    }

    /// Restore the last removed line.  A no-op returning `None` when the
    /// slot is empty.
    pub async fn undo_last_removed(&self) -> Result<Option<CartItem>> {
        self.request(|reply| CartCommand::UndoLastRemoved { reply })
            .await
    }

    /// Delete every line.  Not undoable.
    pub async fn clear(&self) -> Result<usize> {
        self.request(|reply| CartCommand::Clear { reply }).await
    }

    /// Take ordered `lines` out of the cart, leaving anything added since the
    /// snapshot.  Not undoable and leaves the undo slot alone.
    pub async fn settle(&self, lines: &[CartItem]) -> Result<usize> {
        let lines = lines.to_vec();
        self.request(|reply| CartCommand::Settle { lines, reply })
            .await
    }

    /// Current lines, ordered after every previously issued command.
    pub async fn snapshot(&self) -> Result<Vec<CartItem>> {
        self.request(|reply| CartCommand::Snapshot { reply }).await
    }

    /// Observe the cart.  The receiver starts with the latest lines.
    pub fn items(&self) -> watch::Receiver<Vec<CartItem>> {
        self.items_rx.clone()
    }

    /// Total of the latest published lines.
    pub fn total(&self) -> f64 {
        self.items_rx.borrow().iter().map(CartItem::line_total).sum()
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> CartCommand) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(build(reply))
            .await
            .map_err(|_| actor_stopped())?;
        rx.await.map_err(|_| actor_stopped())?
    }
}

fn actor_stopped() -> ClientError {
    ClientError::Persistence(StoreError::Task("cart actor stopped".into()))
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct CartActor {
    store: StoreHandle,
    events: EventBus,
    items_tx: watch::Sender<Vec<CartItem>>,
    last_removed: Option<CartItem>,
}

impl CartActor {
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<CartCommand>) {
        debug!("cart actor started");

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                CartCommand::Add { product, reply } => {
                    let _ = reply.send(self.add(product).await);
                }
                CartCommand::ChangeQuantity {
                    product_id,
                    delta,
                    reply,
                } => {
                    let _ = reply.send(self.change_quantity(product_id, delta).await);
                }
                CartCommand::Remove { line_id, reply } => {
                    let _ = reply.send(self.remove(line_id).await);
                }
                CartCommand::UndoLastRemoved { reply } => {
                    let _ = reply.send(self.undo().await);
                }
                CartCommand::Clear { reply } => {
                    let _ = reply.send(self.clear().await);
                }
                CartCommand::Settle { lines, reply } => {
                    let _ = reply.send(self.settle(lines).await);
                }
                CartCommand::Snapshot { reply } => {
                    let _ = reply.send(Ok(self.items_tx.borrow().clone()));
                }
            }
        }

        debug!("cart actor stopped");
    }

    async fn add(&mut self, product: Product) -> Result<CartItem> {
        let (line, lines) = self
            .store
            .call(move |db| {
                let line = match db.get_cart_item_by_product(product.id)? {
                    Some(mut existing) => {
                        existing.quantity = existing
                            .quantity
                            .checked_add(1)
                            .ok_or(StoreError::InvalidQuantity(existing.quantity))?;
                        db.update_cart_quantity(existing.id, existing.quantity)?;
                        existing
                    }
                    None => db.insert_cart_item(&NewCartItem::from_product(&product))?,
                };
                Ok((line, db.list_cart_items()?))
            })
            .await?;

        debug!(line_id = line.id, product_id = line.product_id, quantity = line.quantity, "cart add");
        self.publish(lines);
        self.events.emit(UiEvent::new(EventSource::Cart, MSG_CART_ADDED));
        Ok(line)
    }

    async fn change_quantity(&mut self, product_id: i64, delta: i64) -> Result<Option<CartItem>> {
        let existing = self
            .store
            .call(move |db| db.get_cart_item_by_product(product_id))
            .await?;
        let Some(mut line) = existing else {
            debug!(product_id, "quantity change for product not in cart");
            return Ok(None);
        };

        let quantity = line.quantity.checked_add(delta).ok_or_else(|| {
            ClientError::Validation(format!(
                "quantity {} + {delta} is out of range",
                line.quantity
            ))
        })?;
        if quantity <= 0 {
            self.remove(line.id).await?;
            return Ok(None);
        }

        line.quantity = quantity;
        let line_id = line.id;
        let lines = self
            .store
            .call(move |db| {
                db.update_cart_quantity(line_id, quantity)?;
                db.list_cart_items()
            })
            .await?;
        self.publish(lines);
        Ok(Some(line))
    }

    async fn remove(&mut self, line_id: i64) -> Result<Option<CartItem>> {
        let (removed, lines) = self
            .store
            .call(move |db| {
                let removed = match db.get_cart_item(line_id)? {
                    Some(line) if db.delete_cart_item(line_id)? => Some(line),
                    _ => None,
                };
                Ok((removed, db.list_cart_items()?))
            })
            .await?;

        let Some(removed) = removed else {
            debug!(line_id, "remove of missing line ignored");
            return Ok(None);
        };

        // The slot holds exactly one line; a new removal replaces it.
        self.last_removed = Some(removed.clone());
        self.publish(lines);
        self.events.emit(
            UiEvent::new(EventSource::Cart, MSG_CART_REMOVED).with_action(ACTION_UNDO),
        );
        Ok(Some(removed))
    }

    async fn undo(&mut self) -> Result<Option<CartItem>> {
        let Some(line) = self.last_removed.take() else {
            return Ok(None);
        };

        let restore = line.clone();
        let result = self
            .store
            .call(move |db| {
                db.restore_cart_item(&restore)?;
                db.list_cart_items()
            })
            .await;

        match result {
            Ok(lines) => {
                self.publish(lines);
                self.events.emit(UiEvent::new(EventSource::Cart, MSG_CART_UNDONE));
                Ok(Some(line))
            }
            Err(e) => {
                warn!(line_id = line.id, error = %e, "undo failed, keeping slot");
                self.last_removed = Some(line);
                Err(e.into())
            }
        }
    }

    async fn clear(&mut self) -> Result<usize> {
        let removed = self.store.call(|db| db.clear_cart()).await?;
        self.publish(Vec::new());
        self.events.emit(UiEvent::new(EventSource::Cart, MSG_CART_CLEARED));
        Ok(removed)
    }

    async fn settle(&mut self, ordered: Vec<CartItem>) -> Result<usize> {
        let (deleted, lines) = self
            .store
            .call(move |db| {
                let deleted = db.settle_cart_lines(&ordered)?;
                Ok((deleted, db.list_cart_items()?))
            })
            .await?;

        debug!(deleted, remaining = lines.len(), "cart settled after order");
        self.publish(lines);
        self.events.emit(UiEvent::new(EventSource::Cart, MSG_CART_CLEARED));
        Ok(deleted)
    }

    fn publish(&self, lines: Vec<CartItem>) {
        self.items_tx.send_replace(lines);
    }
}
