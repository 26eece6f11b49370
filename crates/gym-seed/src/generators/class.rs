//! Class session and booking generation.

use rand::{Rng, seq::SliceRandom};
use time::{Duration, OffsetDateTime};

use super::pick;
use crate::config::{SeedConfig, Span};
use crate::db::SeedError;

/// The three session sizes. The tier decides how full a session gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityTier {
    /// One seat, always booked.
    Private,
    /// Ten seats.
    Small,
    /// Thirty seats.
    Large,
}

impl CapacityTier {
    pub const ALL: [CapacityTier; 3] = [
        CapacityTier::Private,
        CapacityTier::Small,
        CapacityTier::Large,
    ];

    pub fn seats(&self) -> i32 {
        match self {
            CapacityTier::Private => 1,
            CapacityTier::Small => 10,
            CapacityTier::Large => 30,
        }
    }

    pub fn from_seats(seats: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.seats() == seats)
    }

    /// Picks a tier uniformly.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Number of bookings to create for a session of this tier.
    ///
    /// Both spans must be non-negative, as [`SeedConfig::validate`] ensures.
    pub fn fill_count(&self, small: Span, large: Span, rng: &mut impl Rng) -> usize {
        match self {
            CapacityTier::Private => 1,
            CapacityTier::Small => small.sample(rng) as usize,
            CapacityTier::Large => large.sample(rng) as usize,
        }
    }
}

/// Generated class session data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedClassSession {
    pub service_type_id: i32,
    pub trainer_id: i32,
    pub branch_id: i32,
    pub schedule_time: OffsetDateTime,
    pub tier: CapacityTier,
}

impl GeneratedClassSession {
    pub fn total_seats(&self) -> i32 {
        self.tier.seats()
    }
}

/// A stored session as returned by the insert: its id and seat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct SessionSlot {
    pub session_id: i32,
    pub total_seats: i32,
}

/// Generated booking ready for database insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratedBooking {
    pub session_id: i32,
    pub member_id: i32,
}

/// Generates upcoming class sessions and fills them with bookings.
pub struct ClassGenerator {
    session_count: usize,
    days_ahead: Span,
    small_fill: Span,
    large_fill: Span,
}

impl ClassGenerator {
    pub fn from_config(config: &SeedConfig) -> Self {
        Self {
            session_count: config.session_count,
            days_ahead: config.session_days_ahead,
            small_fill: config.small_class_fill,
            large_fill: config.large_class_fill,
        }
    }

    /// Generates sessions with a random service, trainer, branch, start time
    /// and capacity tier.
    pub fn generate_sessions(
        &self,
        service_type_ids: &[i32],
        trainer_ids: &[i32],
        branch_ids: &[i32],
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedClassSession>, SeedError> {
        (0..self.session_count)
            .map(|_| {
                let service_type_id = pick(service_type_ids, "service types", rng)?;
                let trainer_id = pick(trainer_ids, "trainers", rng)?;
                let branch_id = pick(branch_ids, "branches", rng)?;

                Ok(GeneratedClassSession {
                    service_type_id,
                    trainer_id,
                    branch_id,
                    schedule_time: now + Duration::days(self.days_ahead.sample(rng)),
                    tier: CapacityTier::random(rng),
                })
            })
            .collect()
    }

    /// Books each session to its tier's fill count with distinct members.
    pub fn generate_bookings(
        &self,
        sessions: &[SessionSlot],
        member_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedBooking>, SeedError> {
        let mut bookings = Vec::new();

        for slot in sessions {
            let tier = CapacityTier::from_seats(slot.total_seats).ok_or(
                SeedError::UnknownCapacity {
                    seats: slot.total_seats,
                },
            )?;
            let fill = tier.fill_count(self.small_fill, self.large_fill, rng);

            if fill > member_ids.len() {
                return Err(SeedError::InsufficientMembers {
                    needed: fill,
                    available: member_ids.len(),
                });
            }

            bookings.extend(
                member_ids
                    .choose_multiple(rng, fill)
                    .map(|&member_id| GeneratedBooking {
                        session_id: slot.session_id,
                        member_id,
                    }),
            );
        }

        Ok(bookings)
    }
}

impl Default for ClassGenerator {
    fn default() -> Self {
        Self::from_config(&SeedConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_sessions_are_upcoming_with_known_tiers() {
        let mut rng = StdRng::seed_from_u64(21);
        let now = OffsetDateTime::now_utc();

        let sessions = ClassGenerator::default()
            .generate_sessions(&[1, 2, 3], &[10, 11], &[100, 101, 102], now, &mut rng)
            .unwrap();

        assert_eq!(sessions.len(), 300);
        for s in &sessions {
            let ahead = (s.schedule_time - now).whole_days();
            assert!((1..=14).contains(&ahead));
            assert!([1, 10, 30].contains(&s.total_seats()));
        }

        // 300 uniform draws over three tiers hit all of them.
        let tiers: HashSet<_> = sessions.iter().map(|s| s.tier).collect();
        assert_eq!(tiers.len(), 3);
    }

    #[test]
    fn test_bookings_follow_capacity_tier() {
        let mut rng = StdRng::seed_from_u64(21);
        let members: Vec<i32> = (1..=500).collect();
        let slots: Vec<SessionSlot> = (0..90)
            .map(|i| SessionSlot {
                session_id: i,
                total_seats: CapacityTier::ALL[i as usize % 3].seats(),
            })
            .collect();

        let bookings = ClassGenerator::default()
            .generate_bookings(&slots, &members, &mut rng)
            .unwrap();

        let mut per_session: HashMap<i32, HashSet<i32>> = HashMap::new();
        for b in &bookings {
            assert!(per_session.entry(b.session_id).or_default().insert(b.member_id));
        }

        for slot in &slots {
            let booked = per_session.get(&slot.session_id).map_or(0, |m| m.len());
            match slot.total_seats {
                1 => assert_eq!(booked, 1),
                10 => assert!((5..=10).contains(&booked), "got {booked}"),
                30 => assert!((15..=30).contains(&booked), "got {booked}"),
                other => panic!("unexpected capacity {other}"),
            }
        }
    }

    #[test]
    fn test_bookings_need_enough_members() {
        let mut rng = StdRng::seed_from_u64(21);
        let slots = [SessionSlot {
            session_id: 1,
            total_seats: 30,
        }];

        let err = ClassGenerator::default()
            .generate_bookings(&slots, &[1, 2, 3], &mut rng)
            .unwrap_err();

        assert!(matches!(
            err,
            SeedError::InsufficientMembers { available: 3, .. }
        ));
    }

    #[test]
    fn test_unknown_capacity_is_rejected() {
        let mut rng = StdRng::seed_from_u64(21);
        let slots = [SessionSlot {
            session_id: 1,
            total_seats: 12,
        }];

        let err = ClassGenerator::default()
            .generate_bookings(&slots, &[1, 2, 3], &mut rng)
            .unwrap_err();

        assert!(matches!(err, SeedError::UnknownCapacity { seats: 12 }));
    }

    #[test]
    fn test_private_fill_is_one() {
        let mut rng = StdRng::seed_from_u64(21);
        let (small, large) = (Span::new(5, 10), Span::new(15, 30));
        assert_eq!(CapacityTier::Private.fill_count(small, large, &mut rng), 1);
    }
}
