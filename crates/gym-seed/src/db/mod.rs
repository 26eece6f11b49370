//! Database integration for seeding.
//!
//! The [`Seeder`] drives the ten seeding steps through any [`SeedStore`]:
//! [`PgStore`] writes into a PostgreSQL connection or transaction, and
//! [`MemoryStore`] keeps rows in memory with the same key rules.

mod memory;
mod postgres;
mod seeder;
mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seeder::{SeedError, SeedSummary, Seeder, StaffIds};
pub use store::{SeedStore, StaffRecord, Table};
