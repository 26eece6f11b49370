//! PostgreSQL-backed [`SeedStore`].

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::{SeedError, SeedStore, StaffRecord, Table};
use crate::generators::{
    GeneratedBooking, GeneratedBranch, GeneratedBranchInventory, GeneratedClassSession,
    GeneratedMember, GeneratedSpecialization, GeneratedStaff, GeneratedSubscription,
    MembershipPlan, SessionSlot, StaffRole,
};

/// Writes through a single connection, normally an open transaction.
pub struct PgStore<'c> {
    conn: &'c mut PgConnection,
    batch_size: usize,
}

impl<'c> PgStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self {
            conn,
            batch_size: 1000,
        }
    }

    /// Sets the number of rows per multi-row insert.
    ///
    /// Keep `batch_size * columns` under PostgreSQL's 65535 bind parameters.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

#[async_trait]
impl SeedStore for PgStore<'_> {
    async fn insert_service_type(&mut self, name: &str) -> Result<i32, SeedError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO service_types (service_name) VALUES ($1) RETURNING service_type_id",
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    async fn insert_membership_plan(&mut self, plan: &MembershipPlan) -> Result<i32, SeedError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO membership_plans (tier_name, fee, duration)
            VALUES ($1, $2, $3)
            RETURNING plan_id
            "#,
        )
        .bind(plan.tier_name)
        .bind(plan.fee)
        .bind(plan.duration)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    async fn insert_staff(
        &mut self,
        staff: &[GeneratedStaff],
    ) -> Result<Vec<StaffRecord>, SeedError> {
        let mut records = Vec::with_capacity(staff.len());

        for chunk in staff.chunks(self.batch_size) {
            let mut qb =
                QueryBuilder::<Postgres>::new("INSERT INTO staff (staff_name, staff_role) ");
            qb.push_values(chunk, |mut row, s| {
                row.push_bind(s.name.clone()).push_bind(s.role.as_str());
            });
            qb.push(" RETURNING staff_id, staff_role");

            let rows: Vec<(i32, String)> = qb.build_query_as().fetch_all(&mut *self.conn).await?;
            for (staff_id, role) in rows {
                let role = StaffRole::from_db_str(&role).ok_or_else(|| SeedError::Constraint {
                    table: Table::Staff,
                    detail: format!("unknown staff_role {role:?}"),
                })?;
                records.push(StaffRecord { staff_id, role });
            }
        }

        Ok(records)
    }

    async fn insert_branch(&mut self, branch: &GeneratedBranch) -> Result<i32, SeedError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO branches (branch_address, branch_capacity, manager_id)
            VALUES ($1, $2, $3)
            RETURNING branch_id
            "#,
        )
        .bind(&branch.address)
        .bind(branch.capacity)
        .bind(branch.manager_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    async fn insert_members(
        &mut self,
        members: &[GeneratedMember],
    ) -> Result<Vec<i32>, SeedError> {
        let mut ids = Vec::with_capacity(members.len());

        for chunk in members.chunks(self.batch_size) {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO members (member_name, member_phoneno, member_address) ",
            );
            qb.push_values(chunk, |mut row, m| {
                row.push_bind(m.name.clone())
                    .push_bind(m.phone)
                    .push_bind(m.address.clone());
            });
            qb.push(" ON CONFLICT (member_phoneno) DO NOTHING RETURNING member_id");

            let inserted: Vec<i32> = qb.build_query_scalar().fetch_all(&mut *self.conn).await?;
            ids.extend(inserted);
        }

        Ok(ids)
    }

    async fn insert_specializations(
        &mut self,
        rows: &[GeneratedSpecialization],
    ) -> Result<u64, SeedError> {
        let mut written = 0;

        for chunk in rows.chunks(self.batch_size) {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO trainer_specialization (trainer_id, service_type_id) ",
            );
            qb.push_values(chunk, |mut row, s| {
                row.push_bind(s.trainer_id).push_bind(s.service_type_id);
            });
            qb.push(" ON CONFLICT DO NOTHING");

            written += qb.build().execute(&mut *self.conn).await?.rows_affected();
        }

        Ok(written)
    }

    async fn insert_subscriptions(
        &mut self,
        rows: &[GeneratedSubscription],
    ) -> Result<u64, SeedError> {
        let mut written = 0;

        for chunk in rows.chunks(self.batch_size) {
            let mut qb = QueryBuilder::<Postgres>::new(
                r#"
                INSERT INTO subscriptions
                    (member_id, plan_id, branch_id, payment_date, start_date)
                "#,
            );
            qb.push_values(chunk, |mut row, s| {
                row.push_bind(s.member_id)
                    .push_bind(s.plan_id)
                    .push_bind(s.branch_id)
                    .push_bind(s.payment_date)
                    .push_bind(s.start_date);
            });
            qb.push(" ON CONFLICT (member_id, plan_id, branch_id, payment_date) DO NOTHING");

            written += qb.build().execute(&mut *self.conn).await?.rows_affected();
        }

        Ok(written)
    }

    async fn insert_inventory_item(&mut self, name: &str) -> Result<i32, SeedError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO inventory_items (item_name) VALUES ($1) RETURNING item_id",
        )
        .bind(name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    async fn insert_branch_inventory(
        &mut self,
        rows: &[GeneratedBranchInventory],
    ) -> Result<u64, SeedError> {
        let mut written = 0;

        for chunk in rows.chunks(self.batch_size) {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO branch_inventories (branch_id, item_id, quantity) ",
            );
            qb.push_values(chunk, |mut row, inv| {
                row.push_bind(inv.branch_id)
                    .push_bind(inv.item_id)
                    .push_bind(inv.quantity);
            });

            written += qb.build().execute(&mut *self.conn).await?.rows_affected();
        }

        Ok(written)
    }

    async fn insert_class_sessions(
        &mut self,
        rows: &[GeneratedClassSession],
    ) -> Result<Vec<SessionSlot>, SeedError> {
        let mut slots = Vec::with_capacity(rows.len());

        for chunk in rows.chunks(self.batch_size) {
            let mut qb = QueryBuilder::<Postgres>::new(
                r#"
                INSERT INTO class_sessions
                    (service_type_id, trainer_id, branch_id, schedule_time, total_seats)
                "#,
            );
            qb.push_values(chunk, |mut row, s| {
                row.push_bind(s.service_type_id)
                    .push_bind(s.trainer_id)
                    .push_bind(s.branch_id)
                    .push_bind(s.schedule_time)
                    .push_bind(s.total_seats());
            });
            qb.push(" RETURNING session_id, total_seats");

            let inserted: Vec<SessionSlot> =
                qb.build_query_as().fetch_all(&mut *self.conn).await?;
            slots.extend(inserted);
        }

        Ok(slots)
    }

    async fn insert_bookings(&mut self, rows: &[GeneratedBooking]) -> Result<u64, SeedError> {
        let mut written = 0;

        for chunk in rows.chunks(self.batch_size) {
            let mut qb =
                QueryBuilder::<Postgres>::new("INSERT INTO booking (session_id, member_id) ");
            qb.push_values(chunk, |mut row, b| {
                row.push_bind(b.session_id).push_bind(b.member_id);
            });
            qb.push(" ON CONFLICT DO NOTHING");

            written += qb.build().execute(&mut *self.conn).await?.rows_affected();
        }

        Ok(written)
    }
}
