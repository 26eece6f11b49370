//! In-memory [`SeedStore`] with the schema's key and conflict rules.

use std::collections::HashSet;

use async_trait::async_trait;
use time::Date;

use super::{SeedError, SeedStore, StaffRecord, Table};
use crate::generators::{
    GeneratedBooking, GeneratedBranch, GeneratedBranchInventory, GeneratedClassSession,
    GeneratedMember, GeneratedSpecialization, GeneratedStaff, GeneratedSubscription,
    MembershipPlan, SessionSlot,
};

/// Holds rows in vectors and hands out sequential ids starting at 1, like a
/// `SERIAL` column on a fresh table.
///
/// Foreign keys are checked before a batch is applied, so a rejected batch
/// writes nothing. [`MemoryStore::fail_on`] makes every insert into one table
/// fail. [`MemoryStore::begin`] opens a transaction that
/// [`MemoryStore::rollback`] undoes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    service_types: Vec<(i32, String)>,
    membership_plans: Vec<(i32, MembershipPlan)>,
    staff: Vec<(i32, GeneratedStaff)>,
    branches: Vec<(i32, GeneratedBranch)>,
    members: Vec<(i32, GeneratedMember)>,
    specializations: Vec<GeneratedSpecialization>,
    subscriptions: Vec<(i32, GeneratedSubscription)>,
    inventory_items: Vec<(i32, String)>,
    branch_inventories: Vec<GeneratedBranchInventory>,
    class_sessions: Vec<(i32, GeneratedClassSession)>,
    bookings: Vec<(i32, GeneratedBooking)>,

    phones: HashSet<i64>,
    specialization_keys: HashSet<(i32, i32)>,
    subscription_keys: HashSet<(i32, i32, i32, Date)>,
    inventory_keys: HashSet<(i32, i32)>,
    booking_keys: HashSet<(i32, i32)>,

    fail_on: Option<Table>,
    snapshot: Option<Box<MemoryStore>>,
}

fn next_id<T>(rows: &[T]) -> i32 {
    rows.len() as i32 + 1
}

fn has_id<T>(rows: &[(i32, T)], id: i32) -> bool {
    id >= 1 && (id as usize) <= rows.len()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every insert into `table` fail with a constraint error.
    pub fn fail_on(mut self, table: Table) -> Self {
        self.fail_on = Some(table);
        self
    }

    /// Starts a transaction. Rows inserted from here on are discarded by
    /// [`MemoryStore::rollback`].
    pub fn begin(&mut self) {
        self.snapshot = Some(Box::new(self.clone()));
    }

    /// Keeps everything written since [`MemoryStore::begin`].
    pub fn commit(&mut self) {
        self.snapshot = None;
    }

    /// Restores the tables to their state at [`MemoryStore::begin`]. Does
    /// nothing outside a transaction.
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self = *snapshot;
        }
    }

    pub fn row_count(&self, table: Table) -> usize {
        match table {
            Table::ServiceTypes => self.service_types.len(),
            Table::MembershipPlans => self.membership_plans.len(),
            Table::Staff => self.staff.len(),
            Table::Branches => self.branches.len(),
            Table::Members => self.members.len(),
            Table::TrainerSpecialization => self.specializations.len(),
            Table::Subscriptions => self.subscriptions.len(),
            Table::InventoryItems => self.inventory_items.len(),
            Table::BranchInventories => self.branch_inventories.len(),
            Table::ClassSessions => self.class_sessions.len(),
            Table::Booking => self.bookings.len(),
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &GeneratedMember> {
        self.members.iter().map(|(_, m)| m)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &GeneratedSubscription> {
        self.subscriptions.iter().map(|(_, s)| s)
    }

    pub fn branch_inventories(&self) -> &[GeneratedBranchInventory] {
        &self.branch_inventories
    }

    pub fn class_sessions(&self) -> &[(i32, GeneratedClassSession)] {
        &self.class_sessions
    }

    pub fn bookings(&self) -> impl Iterator<Item = &GeneratedBooking> {
        self.bookings.iter().map(|(_, b)| b)
    }

    fn check_enabled(&self, table: Table) -> Result<(), SeedError> {
        if self.fail_on == Some(table) {
            return Err(SeedError::Constraint {
                table,
                detail: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn check_reference(
        table: Table,
        exists: bool,
        column: &str,
        id: i32,
    ) -> Result<(), SeedError> {
        if exists {
            Ok(())
        } else {
            Err(SeedError::Constraint {
                table,
                detail: format!("{column} {id} does not exist"),
            })
        }
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    async fn insert_service_type(&mut self, name: &str) -> Result<i32, SeedError> {
        self.check_enabled(Table::ServiceTypes)?;

        let id = next_id(&self.service_types);
        self.service_types.push((id, name.to_string()));
        Ok(id)
    }

    async fn insert_membership_plan(&mut self, plan: &MembershipPlan) -> Result<i32, SeedError> {
        self.check_enabled(Table::MembershipPlans)?;

        let id = next_id(&self.membership_plans);
        self.membership_plans.push((id, *plan));
        Ok(id)
    }

    async fn insert_staff(
        &mut self,
        staff: &[GeneratedStaff],
    ) -> Result<Vec<StaffRecord>, SeedError> {
        self.check_enabled(Table::Staff)?;

        let mut records = Vec::with_capacity(staff.len());
        for s in staff {
            let staff_id = next_id(&self.staff);
            self.staff.push((staff_id, s.clone()));
            records.push(StaffRecord {
                staff_id,
                role: s.role,
            });
        }
        Ok(records)
    }

    async fn insert_branch(&mut self, branch: &GeneratedBranch) -> Result<i32, SeedError> {
        self.check_enabled(Table::Branches)?;
        Self::check_reference(
            Table::Branches,
            has_id(&self.staff, branch.manager_id),
            "manager_id",
            branch.manager_id,
        )?;

        let id = next_id(&self.branches);
        self.branches.push((id, branch.clone()));
        Ok(id)
    }

    async fn insert_members(
        &mut self,
        members: &[GeneratedMember],
    ) -> Result<Vec<i32>, SeedError> {
        self.check_enabled(Table::Members)?;

        let mut ids = Vec::new();
        for m in members {
            if self.phones.insert(m.phone) {
                let id = next_id(&self.members);
                self.members.push((id, m.clone()));
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn insert_specializations(
        &mut self,
        rows: &[GeneratedSpecialization],
    ) -> Result<u64, SeedError> {
        let table = Table::TrainerSpecialization;
        self.check_enabled(table)?;
        for s in rows {
            Self::check_reference(
                table,
                has_id(&self.staff, s.trainer_id),
                "trainer_id",
                s.trainer_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.service_types, s.service_type_id),
                "service_type_id",
                s.service_type_id,
            )?;
        }

        let mut written = 0;
        for s in rows {
            if self.specialization_keys.insert((s.trainer_id, s.service_type_id)) {
                self.specializations.push(*s);
                written += 1;
            }
        }
        Ok(written)
    }

    async fn insert_subscriptions(
        &mut self,
        rows: &[GeneratedSubscription],
    ) -> Result<u64, SeedError> {
        let table = Table::Subscriptions;
        self.check_enabled(table)?;
        for s in rows {
            Self::check_reference(
                table,
                has_id(&self.members, s.member_id),
                "member_id",
                s.member_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.membership_plans, s.plan_id),
                "plan_id",
                s.plan_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.branches, s.branch_id),
                "branch_id",
                s.branch_id,
            )?;
        }

        let mut written = 0;
        for s in rows {
            let key = (s.member_id, s.plan_id, s.branch_id, s.payment_date);
            if self.subscription_keys.insert(key) {
                let id = next_id(&self.subscriptions);
                self.subscriptions.push((id, s.clone()));
                written += 1;
            }
        }
        Ok(written)
    }

    async fn insert_inventory_item(&mut self, name: &str) -> Result<i32, SeedError> {
        self.check_enabled(Table::InventoryItems)?;

        let id = next_id(&self.inventory_items);
        self.inventory_items.push((id, name.to_string()));
        Ok(id)
    }

    async fn insert_branch_inventory(
        &mut self,
        rows: &[GeneratedBranchInventory],
    ) -> Result<u64, SeedError> {
        let table = Table::BranchInventories;
        self.check_enabled(table)?;

        // No conflict policy here: a repeated pair fails the whole batch.
        let mut batch_keys = HashSet::with_capacity(rows.len());
        for inv in rows {
            Self::check_reference(
                table,
                has_id(&self.branches, inv.branch_id),
                "branch_id",
                inv.branch_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.inventory_items, inv.item_id),
                "item_id",
                inv.item_id,
            )?;
            let key = (inv.branch_id, inv.item_id);
            if self.inventory_keys.contains(&key) || !batch_keys.insert(key) {
                return Err(SeedError::Constraint {
                    table,
                    detail: format!("duplicate (branch_id, item_id) {key:?}"),
                });
            }
        }

        self.inventory_keys.extend(batch_keys);
        self.branch_inventories.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn insert_class_sessions(
        &mut self,
        rows: &[GeneratedClassSession],
    ) -> Result<Vec<SessionSlot>, SeedError> {
        let table = Table::ClassSessions;
        self.check_enabled(table)?;
        for s in rows {
            Self::check_reference(
                table,
                has_id(&self.service_types, s.service_type_id),
                "service_type_id",
                s.service_type_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.staff, s.trainer_id),
                "trainer_id",
                s.trainer_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.branches, s.branch_id),
                "branch_id",
                s.branch_id,
            )?;
        }

        let mut slots = Vec::with_capacity(rows.len());
        for s in rows {
            let session_id = next_id(&self.class_sessions);
            self.class_sessions.push((session_id, s.clone()));
            slots.push(SessionSlot {
                session_id,
                total_seats: s.total_seats(),
            });
        }
        Ok(slots)
    }

    async fn insert_bookings(&mut self, rows: &[GeneratedBooking]) -> Result<u64, SeedError> {
        let table = Table::Booking;
        self.check_enabled(table)?;
        for b in rows {
            Self::check_reference(
                table,
                has_id(&self.class_sessions, b.session_id),
                "session_id",
                b.session_id,
            )?;
            Self::check_reference(
                table,
                has_id(&self.members, b.member_id),
                "member_id",
                b.member_id,
            )?;
        }

        let mut written = 0;
        for b in rows {
            if self.booking_keys.insert((b.session_id, b.member_id)) {
                let id = next_id(&self.bookings);
                self.bookings.push((id, *b));
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::StaffRole;
    use time::macros::date;

    fn member(phone: i64) -> GeneratedMember {
        GeneratedMember {
            name: "Alex Kim".to_string(),
            phone,
            address: "Springfield".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let mut store = MemoryStore::new();
        assert_eq!(store.insert_service_type("Yoga").await.unwrap(), 1);
        assert_eq!(store.insert_service_type("Zumba").await.unwrap(), 2);
        assert_eq!(store.insert_inventory_item("Treadmill").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_phones_are_skipped() {
        let mut store = MemoryStore::new();
        let ids = store
            .insert_members(&[member(5550000001), member(5550000002), member(5550000001)])
            .await
            .unwrap();

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.row_count(Table::Members), 2);
    }

    #[tokio::test]
    async fn test_missing_reference_is_rejected() {
        let mut store = MemoryStore::new();
        let err = store
            .insert_branch(&GeneratedBranch {
                address: "1 Main St".to_string(),
                capacity: 100,
                manager_id: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::Constraint { table: Table::Branches, .. }));
        assert_eq!(store.row_count(Table::Branches), 0);
    }

    #[tokio::test]
    async fn test_subscription_conflicts_are_skipped() {
        let mut store = MemoryStore::new();
        store
            .insert_membership_plan(&crate::generators::MEMBERSHIP_PLANS[0])
            .await
            .unwrap();
        let manager = store
            .insert_staff(&[GeneratedStaff {
                name: "Sam Lee".to_string(),
                role: StaffRole::Manager,
            }])
            .await
            .unwrap()[0]
            .staff_id;
        let branch = store
            .insert_branch(&GeneratedBranch {
                address: "1 Main St".to_string(),
                capacity: 100,
                manager_id: manager,
            })
            .await
            .unwrap();
        let member_id = store.insert_members(&[member(5550000001)]).await.unwrap()[0];

        let day = date!(2025 - 01 - 10);
        let sub = GeneratedSubscription {
            member_id,
            plan_id: 1,
            branch_id: branch,
            payment_date: day,
            start_date: day,
            status: crate::generators::SubscriptionStatus::Active,
        };

        let written = store.insert_subscriptions(&[sub.clone(), sub]).await.unwrap();
        assert_eq!(written, 1);
    }

    #[tokio::test]
    async fn test_duplicate_inventory_pair_fails_batch() {
        let mut store = MemoryStore::new();
        let manager = store
            .insert_staff(&[GeneratedStaff {
                name: "Sam Lee".to_string(),
                role: StaffRole::Manager,
            }])
            .await
            .unwrap()[0]
            .staff_id;
        let branch_id = store
            .insert_branch(&GeneratedBranch {
                address: "1 Main St".to_string(),
                capacity: 100,
                manager_id: manager,
            })
            .await
            .unwrap();
        let item_id = store.insert_inventory_item("Kettlebell").await.unwrap();
        let row = GeneratedBranchInventory {
            branch_id,
            item_id,
            quantity: 10,
        };

        assert!(store.insert_branch_inventory(&[row, row]).await.is_err());
        assert_eq!(store.row_count(Table::BranchInventories), 0);
    }

    #[tokio::test]
    async fn test_fail_on_injects_error() {
        let mut store = MemoryStore::new().fail_on(Table::InventoryItems);
        assert!(store.insert_service_type("Yoga").await.is_ok());
        assert!(store.insert_inventory_item("Treadmill").await.is_err());
    }
}
