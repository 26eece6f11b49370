//! Synthetic data seeding for the gym management schema.
//!
//! This crate fills a PostgreSQL database with referentially consistent test
//! data: staff, branches, members, subscriptions, inventory, class sessions,
//! and bookings. Tables are written in dependency order inside one
//! transaction, so a failed run leaves nothing behind.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gym_seed::prelude::*;
//!
//! let summary = Bootstrapper::new(ConnectConfig::default(), SeedConfig::default())
//!     .run()
//!     .await?;
//! println!("seeded {} members", summary.members);
//! ```
//!
//! The [`db::Seeder`] also runs against [`db::MemoryStore`], which is how the
//! distribution rules are tested without a database.

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod generators;
pub mod retry;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::bootstrap::{BootstrapError, Bootstrapper};
    pub use crate::config::{ConfigError, ConnectConfig, SeedConfig, Span, StaffMix};
    pub use crate::db::{MemoryStore, PgStore, SeedError, SeedStore, SeedSummary, Seeder, Table};
    pub use crate::generators::{
        BranchGenerator, CapacityTier, ClassGenerator, DataFaker, EnglishFaker, MemberGenerator,
        StaffGenerator, StaffRole, SubscriptionGenerator,
    };
    pub use crate::retry::{RetryError, RetryPolicy, retry};
}
