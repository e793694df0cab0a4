//! Seed the order store with synthetic orders
//!
//! Usage: `seed-orders [COUNT]` (default 500). The store path comes from
//! `ORDERS_FILE_PATH`, as for the server.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_admin::config::ServerConfig;
use order_admin::order_store::OrderStore;
use order_admin::seed::{seed_orders, DEFAULT_SEED_COUNT};

fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let count = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("COUNT must be a non-negative integer, got '{arg}'"))?,
        None => DEFAULT_SEED_COUNT,
    };

    let store = OrderStore::open(&config.orders_file_path)
        .with_context(|| format!("opening {}", config.orders_file_path.display()))?;
    let seeded = seed_orders(&store, &mut rand::thread_rng(), count)?;

    tracing::info!(
        seeded = seeded.len(),
        total = store.len(),
        path = %config.orders_file_path.display(),
        "seeding complete"
    );
    Ok(())
}
