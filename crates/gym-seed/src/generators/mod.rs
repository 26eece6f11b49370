//! Row generators for the gym schema.
//!
//! Generators are pure: they take the ids produced by earlier inserts plus an
//! rng and return rows ready for insertion.
//! - [`StaffGenerator`]: staff with a fixed role mix, trainer specializations
//! - [`BranchGenerator`]: branches managed by managers, branch inventory
//! - [`MemberGenerator`]: members with unique phone numbers
//! - [`SubscriptionGenerator`]: active and expired subscriptions
//! - [`ClassGenerator`]: class sessions and capacity-driven bookings

pub mod branch;
pub mod catalog;
pub mod class;
pub mod faker;
pub mod member;
pub mod staff;
pub mod subscription;

use rand::{Rng, seq::SliceRandom};

use crate::db::SeedError;

pub use branch::{BranchGenerator, GeneratedBranch, GeneratedBranchInventory};
pub use catalog::{INVENTORY_ITEMS, MEMBERSHIP_PLANS, MembershipPlan, SERVICE_TYPES};
pub use class::{
    CapacityTier, ClassGenerator, GeneratedBooking, GeneratedClassSession, SessionSlot,
};
pub use faker::{DataFaker, EnglishFaker};
pub use member::{GeneratedMember, MemberGenerator};
pub use staff::{GeneratedSpecialization, GeneratedStaff, StaffGenerator, StaffRole};
pub use subscription::{GeneratedSubscription, SubscriptionGenerator, SubscriptionStatus};

/// Picks one id uniformly, failing if the pool is empty.
pub(crate) fn pick<R: Rng + ?Sized>(
    ids: &[i32],
    pool: &'static str,
    rng: &mut R,
) -> Result<i32, SeedError> {
    ids.choose(rng).copied().ok_or(SeedError::EmptyPool { pool })
}
