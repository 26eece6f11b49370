//! Seeds the gym management database.
//!
//! Run with:
//! ```
//! cargo run -p gym-seed --bin seed
//! ```
//!
//! Connects to the fixed `db` host. A seeding failure is logged and rolled
//! back and the process still exits cleanly; only failing to reach or
//! prepare the database is fatal.

use gym_seed::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let summary = match Bootstrapper::new(ConnectConfig::default(), SeedConfig::default())
        .run()
        .await
    {
        Ok(summary) => summary,
        Err(e) if e.is_rolled_back() => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Successfully populated database!");
    tracing::info!("  Service types: {}", summary.service_types);
    tracing::info!("  Membership plans: {}", summary.membership_plans);
    tracing::info!("  Staff: {}", summary.staff);
    tracing::info!("  Branches: {}", summary.branches);
    tracing::info!("  Members: {}", summary.members);
    tracing::info!("  Trainer specializations: {}", summary.trainer_specializations);
    tracing::info!("  Subscriptions: {}", summary.subscriptions);
    tracing::info!("  Inventory items: {}", summary.inventory_items);
    tracing::info!("  Branch inventory rows: {}", summary.branch_inventories);
    tracing::info!("  Class sessions: {}", summary.class_sessions);
    tracing::info!("  Bookings: {}", summary.bookings);

    Ok(())
}
