pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod sync;

use tracing_subscriber::{fmt, EnvFilter};

pub use cart::CartManager;
pub use catalog::CatalogService;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::{EventBus, EventSource, UiEvent};
pub use state::AppState;
pub use sync::{AuthOutcome, OrderHistory, OrderReceipt, OrderSummary, SyncCoordinator};

/// Install the global tracing subscriber.  `RUST_LOG` overrides the default
/// filter.  Calling it again is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("tienda_client=debug,tienda_net=debug,tienda_store=info,warn")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
