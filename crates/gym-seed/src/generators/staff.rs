//! Staff generation with a fixed role mix.

use rand::Rng;

use super::{DataFaker, pick};
use crate::config::StaffMix;
use crate::db::SeedError;

/// Staff role options matching the `staff_role` check constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffRole {
    Manager,
    Trainer,
    Receptionist,
    Cleaner,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Manager,
        StaffRole::Trainer,
        StaffRole::Receptionist,
        StaffRole::Cleaner,
    ];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Manager => "MANAGER",
            StaffRole::Trainer => "TRAINER",
            StaffRole::Receptionist => "RECEPTIONIST",
            StaffRole::Cleaner => "CLEANER",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == s)
    }
}

/// Generated staff data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedStaff {
    pub name: String,
    pub role: StaffRole,
}

/// Generated trainer/service pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratedSpecialization {
    pub trainer_id: i32,
    pub service_type_id: i32,
}

/// Generates staff rows and trainer specializations.
pub struct StaffGenerator {
    mix: StaffMix,
}

impl StaffGenerator {
    pub fn new(mix: StaffMix) -> Self {
        Self { mix }
    }

    /// Generates every staff row, grouped by role in manager, trainer,
    /// receptionist, cleaner order.
    pub fn generate(&self, faker: &impl DataFaker, rng: &mut impl Rng) -> Vec<GeneratedStaff> {
        let counts = [
            (StaffRole::Manager, self.mix.managers),
            (StaffRole::Trainer, self.mix.trainers),
            (StaffRole::Receptionist, self.mix.receptionists),
            (StaffRole::Cleaner, self.mix.cleaners),
        ];

        let mut staff = Vec::with_capacity(self.mix.total());
        for (role, count) in counts {
            for _ in 0..count {
                staff.push(GeneratedStaff {
                    name: faker.name(rng),
                    role,
                });
            }
        }
        staff
    }

    /// Pairs every trainer with one uniformly random service type.
    pub fn generate_specializations(
        &self,
        trainer_ids: &[i32],
        service_type_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedSpecialization>, SeedError> {
        trainer_ids
            .iter()
            .map(|&trainer_id| {
                Ok(GeneratedSpecialization {
                    trainer_id,
                    service_type_id: pick(service_type_ids, "service types", rng)?,
                })
            })
            .collect()
    }
}

impl Default for StaffGenerator {
    fn default() -> Self {
        Self::new(StaffMix::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::EnglishFaker;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_default_role_mix() {
        let mut rng = StdRng::seed_from_u64(3);
        let staff = StaffGenerator::default().generate(&EnglishFaker, &mut rng);

        assert_eq!(staff.len(), 1800);
        let count = |role| staff.iter().filter(|s| s.role == role).count();
        assert_eq!(count(StaffRole::Manager), 100);
        assert_eq!(count(StaffRole::Trainer), 1000);
        assert_eq!(count(StaffRole::Receptionist), 200);
        assert_eq!(count(StaffRole::Cleaner), 500);
        assert!(staff.iter().all(|s| !s.name.is_empty()));
    }

    #[test]
    fn test_role_db_strings() {
        for role in StaffRole::ALL {
            assert_eq!(StaffRole::from_db_str(role.as_str()), Some(role));
        }
        assert_eq!(StaffRole::from_db_str("JANITOR"), None);
    }

    #[test]
    fn test_one_specialization_per_trainer() {
        let mut rng = StdRng::seed_from_u64(3);
        let trainers: Vec<i32> = (100..150).collect();
        let services = [1, 2, 3];

        let specs = StaffGenerator::default()
            .generate_specializations(&trainers, &services, &mut rng)
            .unwrap();

        assert_eq!(specs.len(), trainers.len());
        for (spec, trainer) in specs.iter().zip(&trainers) {
            assert_eq!(spec.trainer_id, *trainer);
            assert!(services.contains(&spec.service_type_id));
        }
    }

    #[test]
    fn test_specializations_need_service_types() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = StaffGenerator::default()
            .generate_specializations(&[1], &[], &mut rng)
            .unwrap_err();

        assert!(matches!(err, SeedError::EmptyPool { pool: "service types" }));
    }
}
