//! Storage contract the seeder writes through.

use std::fmt;

use async_trait::async_trait;

use super::SeedError;
use crate::generators::{
    GeneratedBooking, GeneratedBranch, GeneratedBranchInventory, GeneratedClassSession,
    GeneratedMember, GeneratedSpecialization, GeneratedStaff, GeneratedSubscription,
    MembershipPlan, SessionSlot, StaffRole,
};

/// The eleven tables of the gym schema, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    ServiceTypes,
    MembershipPlans,
    Staff,
    Branches,
    Members,
    TrainerSpecialization,
    Subscriptions,
    InventoryItems,
    BranchInventories,
    ClassSessions,
    Booking,
}

impl Table {
    pub const ALL: [Table; 11] = [
        Table::ServiceTypes,
        Table::MembershipPlans,
        Table::Staff,
        Table::Branches,
        Table::Members,
        Table::TrainerSpecialization,
        Table::Subscriptions,
        Table::InventoryItems,
        Table::BranchInventories,
        Table::ClassSessions,
        Table::Booking,
    ];

    /// Returns the SQL table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::ServiceTypes => "service_types",
            Table::MembershipPlans => "membership_plans",
            Table::Staff => "staff",
            Table::Branches => "branches",
            Table::Members => "members",
            Table::TrainerSpecialization => "trainer_specialization",
            Table::Subscriptions => "subscriptions",
            Table::InventoryItems => "inventory_items",
            Table::BranchInventories => "branch_inventories",
            Table::ClassSessions => "class_sessions",
            Table::Booking => "booking",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored staff row: assigned id and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffRecord {
    pub staff_id: i32,
    pub role: StaffRole,
}

/// Inserts that hand back what the database assigned.
///
/// Id-producing inserts return the new ids. Inserts governed by a conflict
/// policy skip rows that would violate a uniqueness constraint and return the
/// number of rows actually written.
#[async_trait]
pub trait SeedStore: Send {
    async fn insert_service_type(&mut self, name: &str) -> Result<i32, SeedError>;

    async fn insert_membership_plan(&mut self, plan: &MembershipPlan) -> Result<i32, SeedError>;

    async fn insert_staff(
        &mut self,
        staff: &[GeneratedStaff],
    ) -> Result<Vec<StaffRecord>, SeedError>;

    async fn insert_branch(&mut self, branch: &GeneratedBranch) -> Result<i32, SeedError>;

    /// Skips members whose phone number is already stored; returns ids of
    /// the rows written.
    async fn insert_members(&mut self, members: &[GeneratedMember])
    -> Result<Vec<i32>, SeedError>;

    /// Skips duplicate (trainer, service type) pairs.
    async fn insert_specializations(
        &mut self,
        rows: &[GeneratedSpecialization],
    ) -> Result<u64, SeedError>;

    /// Skips duplicates on (member, plan, branch, payment date).
    async fn insert_subscriptions(
        &mut self,
        rows: &[GeneratedSubscription],
    ) -> Result<u64, SeedError>;

    async fn insert_inventory_item(&mut self, name: &str) -> Result<i32, SeedError>;

    async fn insert_branch_inventory(
        &mut self,
        rows: &[GeneratedBranchInventory],
    ) -> Result<u64, SeedError>;

    async fn insert_class_sessions(
        &mut self,
        rows: &[GeneratedClassSession],
    ) -> Result<Vec<SessionSlot>, SeedError>;

    /// Skips duplicate (session, member) pairs.
    async fn insert_bookings(&mut self, rows: &[GeneratedBooking]) -> Result<u64, SeedError>;
}
