//! Subscription generation split into active and expired populations.

use rand::Rng;
use time::{Date, Duration};

use super::pick;
use crate::config::{SeedConfig, Span};
use crate::db::SeedError;

/// Which population a generated subscription belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

/// Generated subscription data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedSubscription {
    pub member_id: i32,
    pub plan_id: i32,
    pub branch_id: i32,
    pub payment_date: Date,
    pub start_date: Date,
    /// Not stored; records which window the start date was drawn from.
    pub status: SubscriptionStatus,
}

/// Generates subscriptions for random (member, plan, branch) triples.
pub struct SubscriptionGenerator {
    active: usize,
    expired: usize,
    active_window: Span,
    expired_window: Span,
}

impl SubscriptionGenerator {
    pub fn from_config(config: &SeedConfig) -> Self {
        Self {
            active: config.active_subscriptions,
            expired: config.expired_subscriptions,
            active_window: config.active_window_days,
            expired_window: config.expired_window_days,
        }
    }

    /// Generates `active + expired` subscriptions. The first `active` rows start
    /// within the active window before `today`, the rest within the expired
    /// window. Payment is taken on the start date.
    pub fn generate(
        &self,
        member_ids: &[i32],
        plan_ids: &[i32],
        branch_ids: &[i32],
        today: Date,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedSubscription>, SeedError> {
        (0..self.active + self.expired)
            .map(|i| {
                let member_id = pick(member_ids, "members", rng)?;
                let plan_id = pick(plan_ids, "membership plans", rng)?;
                let branch_id = pick(branch_ids, "branches", rng)?;

                let (status, window) = if i < self.active {
                    (SubscriptionStatus::Active, self.active_window)
                } else {
                    (SubscriptionStatus::Expired, self.expired_window)
                };
                let start_date = today - Duration::days(window.sample(rng));

                Ok(GeneratedSubscription {
                    member_id,
                    plan_id,
                    branch_id,
                    payment_date: start_date,
                    start_date,
                    status,
                })
            })
            .collect()
    }
}

impl Default for SubscriptionGenerator {
    fn default() -> Self {
        Self::from_config(&SeedConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::date;

    #[test]
    fn test_active_expired_split() {
        let mut rng = StdRng::seed_from_u64(9);
        let today = date!(2025 - 06 - 15);
        let members: Vec<i32> = (1..=10_000).collect();
        let plans = [1, 2, 3, 4];
        let branches: Vec<i32> = (1..=100).collect();

        let subs = SubscriptionGenerator::default()
            .generate(&members, &plans, &branches, today, &mut rng)
            .unwrap();

        assert_eq!(subs.len(), 15_000);

        let age = |s: &GeneratedSubscription| (today - s.start_date).whole_days();
        let active = subs.iter().filter(|s| (0..=20).contains(&age(s))).count();
        let expired = subs.iter().filter(|s| (400..=500).contains(&age(s))).count();
        assert_eq!(active, 9000);
        assert_eq!(expired, 6000);

        for (i, sub) in subs.iter().enumerate() {
            let expected = if i < 9000 {
                SubscriptionStatus::Active
            } else {
                SubscriptionStatus::Expired
            };
            assert_eq!(sub.status, expected);
            assert_eq!(sub.payment_date, sub.start_date);
        }
    }

    #[test]
    fn test_needs_members() {
        let mut rng = StdRng::seed_from_u64(9);
        let err = SubscriptionGenerator::default()
            .generate(&[], &[1], &[1], date!(2025 - 06 - 15), &mut rng)
            .unwrap_err();

        assert!(matches!(err, SeedError::EmptyPool { pool: "members" }));
    }
}
