//! Database seeding in dependency order.

use rand::Rng;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tracing::info;

use super::{SeedStore, StaffRecord, Table};
use crate::config::{ConfigError, SeedConfig};
use crate::generators::{
    BranchGenerator, ClassGenerator, DataFaker, EnglishFaker, INVENTORY_ITEMS, MEMBERSHIP_PLANS,
    MemberGenerator, SERVICE_TYPES, SessionSlot, StaffGenerator, StaffRole,
    SubscriptionGenerator,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid seed configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Constraint violated on {table}: {detail}")]
    Constraint { table: Table, detail: String },
    #[error("No {pool} to choose from")]
    EmptyPool { pool: &'static str },
    #[error("Need {needed} distinct members for a session but only {available} exist")]
    InsufficientMembers { needed: usize, available: usize },
    #[error("Session capacity {seats} is not a known tier")]
    UnknownCapacity { seats: i32 },
}

/// Ids of the staff that other tables reference.
#[derive(Debug, Clone, Default)]
pub struct StaffIds {
    pub managers: Vec<i32>,
    pub trainers: Vec<i32>,
    pub total: usize,
}

impl StaffIds {
    fn from_records(records: &[StaffRecord]) -> Self {
        let ids_for = |role: StaffRole| -> Vec<i32> {
            records
                .iter()
                .filter(|r| r.role == role)
                .map(|r| r.staff_id)
                .collect()
        };

        Self {
            managers: ids_for(StaffRole::Manager),
            trainers: ids_for(StaffRole::Trainer),
            total: records.len(),
        }
    }
}

/// Rows written per table by a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub service_types: usize,
    pub membership_plans: usize,
    pub staff: usize,
    pub branches: usize,
    pub members: usize,
    pub trainer_specializations: u64,
    pub subscriptions: u64,
    pub inventory_items: usize,
    pub branch_inventories: u64,
    pub class_sessions: usize,
    pub bookings: u64,
}

/// Populates every table through a [`SeedStore`].
///
/// Each step only uses ids returned by earlier steps, so running them in
/// order against an empty schema never violates a foreign key.
pub struct Seeder<S, F = EnglishFaker> {
    store: S,
    faker: F,
    config: SeedConfig,
}

impl<S: SeedStore> Seeder<S> {
    /// Creates a seeder that writes through `store` with English fake data.
    pub fn new(store: S, config: SeedConfig) -> Self {
        Self {
            store,
            faker: EnglishFaker,
            config,
        }
    }
}

impl<S: SeedStore, F: DataFaker> Seeder<S, F> {
    /// Replaces the source of names and addresses.
    pub fn with_faker<G: DataFaker>(self, faker: G) -> Seeder<S, G> {
        Seeder {
            store: self.store,
            faker,
            config: self.config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs every step using the current time.
    pub async fn run(&mut self, rng: &mut impl Rng) -> Result<SeedSummary, SeedError> {
        self.run_at(OffsetDateTime::now_utc(), rng).await
    }

    /// Runs every step with `now` as the reference time for subscription
    /// start dates and session schedules.
    pub async fn run_at(
        &mut self,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<SeedSummary, SeedError> {
        self.config.validate()?;
        info!("Starting gym data seeding...");

        let service_type_ids = self.seed_service_types().await?;
        let plan_ids = self.seed_membership_plans().await?;
        let staff = self.seed_staff(rng).await?;
        let branch_ids = self.seed_branches(&staff.managers, rng).await?;
        let member_ids = self.seed_members(rng).await?;
        let trainer_specializations = self
            .seed_trainer_specializations(&staff.trainers, &service_type_ids, rng)
            .await?;
        let subscriptions = self
            .seed_subscriptions(&member_ids, &plan_ids, &branch_ids, now.date(), rng)
            .await?;
        let (item_ids, branch_inventories) = self.seed_inventory(&branch_ids, rng).await?;
        let sessions = self
            .seed_class_sessions(&service_type_ids, &staff.trainers, &branch_ids, now, rng)
            .await?;
        let bookings = self.seed_bookings(&sessions, &member_ids, rng).await?;

        info!("Gym data seeding complete");

        Ok(SeedSummary {
            service_types: service_type_ids.len(),
            membership_plans: plan_ids.len(),
            staff: staff.total,
            branches: branch_ids.len(),
            members: member_ids.len(),
            trainer_specializations,
            subscriptions,
            inventory_items: item_ids.len(),
            branch_inventories,
            class_sessions: sessions.len(),
            bookings,
        })
    }

    /// Step 1: the fixed service type catalogue.
    pub async fn seed_service_types(&mut self) -> Result<Vec<i32>, SeedError> {
        let mut ids = Vec::with_capacity(SERVICE_TYPES.len());
        for name in SERVICE_TYPES {
            ids.push(self.store.insert_service_type(name).await?);
        }

        info!("Seeded {} service types", ids.len());
        Ok(ids)
    }

    /// Step 2: the fixed membership plans.
    pub async fn seed_membership_plans(&mut self) -> Result<Vec<i32>, SeedError> {
        let mut ids = Vec::with_capacity(MEMBERSHIP_PLANS.len());
        for plan in MEMBERSHIP_PLANS {
            ids.push(self.store.insert_membership_plan(plan).await?);
        }

        info!("Seeded {} membership plans", ids.len());
        Ok(ids)
    }

    /// Step 3: staff with the configured role mix.
    pub async fn seed_staff(&mut self, rng: &mut impl Rng) -> Result<StaffIds, SeedError> {
        let staff = StaffGenerator::new(self.config.staff_mix).generate(&self.faker, rng);
        info!("Seeding {} staff...", staff.len());

        let records = self.store.insert_staff(&staff).await?;
        let ids = StaffIds::from_records(&records);

        info!(
            "Seeded {} staff ({} managers, {} trainers)",
            ids.total,
            ids.managers.len(),
            ids.trainers.len()
        );
        Ok(ids)
    }

    /// Step 4: branches, each with a randomly chosen manager.
    pub async fn seed_branches(
        &mut self,
        manager_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Result<Vec<i32>, SeedError> {
        let branches = BranchGenerator::from_config(&self.config).generate(
            manager_ids,
            &self.faker,
            rng,
        )?;
        info!("Seeding {} branches...", branches.len());

        let mut ids = Vec::with_capacity(branches.len());
        for branch in &branches {
            ids.push(self.store.insert_branch(branch).await?);
        }

        info!("Seeded {} branches", ids.len());
        Ok(ids)
    }

    /// Step 5: members with unique phone numbers. Members whose phone is
    /// already stored are skipped, so fewer ids than generated rows may come
    /// back.
    pub async fn seed_members(&mut self, rng: &mut impl Rng) -> Result<Vec<i32>, SeedError> {
        let members = MemberGenerator::new(self.config.member_count).generate(&self.faker, rng);
        info!("Seeding {} unique members...", members.len());

        let ids = self.store.insert_members(&members).await?;

        info!("Seeded {} members", ids.len());
        Ok(ids)
    }

    /// Step 6: one specialization per trainer.
    pub async fn seed_trainer_specializations(
        &mut self,
        trainer_ids: &[i32],
        service_type_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Result<u64, SeedError> {
        let specs = StaffGenerator::new(self.config.staff_mix).generate_specializations(
            trainer_ids,
            service_type_ids,
            rng,
        )?;

        let written = self.store.insert_specializations(&specs).await?;

        info!("Seeded {} trainer specializations", written);
        Ok(written)
    }

    /// Step 7: active then expired subscriptions relative to `today`.
    pub async fn seed_subscriptions(
        &mut self,
        member_ids: &[i32],
        plan_ids: &[i32],
        branch_ids: &[i32],
        today: Date,
        rng: &mut impl Rng,
    ) -> Result<u64, SeedError> {
        let subs = SubscriptionGenerator::from_config(&self.config).generate(
            member_ids, plan_ids, branch_ids, today, rng,
        )?;
        info!(
            "Seeding {} subscriptions ({} active, {} expired)...",
            subs.len(),
            self.config.active_subscriptions,
            self.config.expired_subscriptions
        );

        let written = self.store.insert_subscriptions(&subs).await?;

        info!("Seeded {} subscriptions", written);
        Ok(written)
    }

    /// Step 8: inventory items and a stock row for every (branch, item) pair.
    pub async fn seed_inventory(
        &mut self,
        branch_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Result<(Vec<i32>, u64), SeedError> {
        let mut item_ids = Vec::with_capacity(INVENTORY_ITEMS.len());
        for name in INVENTORY_ITEMS {
            item_ids.push(self.store.insert_inventory_item(name).await?);
        }

        let rows = BranchGenerator::from_config(&self.config).generate_inventory(
            branch_ids, &item_ids, rng,
        );
        let written = self.store.insert_branch_inventory(&rows).await?;

        info!(
            "Seeded {} inventory items stocked across {} branch inventory rows",
            item_ids.len(),
            written
        );
        Ok((item_ids, written))
    }

    /// Step 9: upcoming class sessions.
    pub async fn seed_class_sessions(
        &mut self,
        service_type_ids: &[i32],
        trainer_ids: &[i32],
        branch_ids: &[i32],
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<SessionSlot>, SeedError> {
        let sessions = ClassGenerator::from_config(&self.config).generate_sessions(
            service_type_ids,
            trainer_ids,
            branch_ids,
            now,
            rng,
        )?;
        info!("Seeding {} class sessions (capacity 1, 10, or 30)...", sessions.len());

        let slots = self.store.insert_class_sessions(&sessions).await?;

        info!("Seeded {} class sessions", slots.len());
        Ok(slots)
    }

    /// Step 10: bookings filled by each session's capacity tier.
    pub async fn seed_bookings(
        &mut self,
        sessions: &[SessionSlot],
        member_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Result<u64, SeedError> {
        let bookings =
            ClassGenerator::from_config(&self.config).generate_bookings(sessions, member_ids, rng)?;
        info!("Seeding {} bookings...", bookings.len());

        let written = self.store.insert_bookings(&bookings).await?;

        info!("Seeded {} bookings", written);
        Ok(written)
    }
}
