//! Branch and branch inventory generation.

use rand::Rng;

use super::{DataFaker, pick};
use crate::config::{SeedConfig, Span};
use crate::db::SeedError;

/// Generated branch data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedBranch {
    pub address: String,
    pub capacity: i32,
    pub manager_id: i32,
}

/// Stock of one item at one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedBranchInventory {
    pub branch_id: i32,
    pub item_id: i32,
    pub quantity: i32,
}

/// Generates branches and their inventory.
///
/// Capacity and quantity spans must fit an `INTEGER` column; build from a
/// [`SeedConfig`] that passed [`SeedConfig::validate`].
pub struct BranchGenerator {
    count: usize,
    capacity: Span,
    quantity: Span,
}

impl BranchGenerator {
    pub fn new(count: usize, capacity: Span, quantity: Span) -> Self {
        Self {
            count,
            capacity,
            quantity,
        }
    }

    pub fn from_config(config: &SeedConfig) -> Self {
        Self::new(
            config.branch_count,
            config.branch_capacity,
            config.inventory_quantity,
        )
    }

    /// Generates branches, each run by a uniformly chosen manager.
    pub fn generate(
        &self,
        manager_ids: &[i32],
        faker: &impl DataFaker,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedBranch>, SeedError> {
        (0..self.count)
            .map(|_| {
                Ok(GeneratedBranch {
                    address: faker.street_address(rng),
                    capacity: self.capacity.sample(rng) as i32,
                    manager_id: pick(manager_ids, "managers", rng)?,
                })
            })
            .collect()
    }

    /// Generates one inventory row for every (branch, item) pair.
    pub fn generate_inventory(
        &self,
        branch_ids: &[i32],
        item_ids: &[i32],
        rng: &mut impl Rng,
    ) -> Vec<GeneratedBranchInventory> {
        let mut rows = Vec::with_capacity(branch_ids.len() * item_ids.len());
        for &branch_id in branch_ids {
            for &item_id in item_ids {
                rows.push(GeneratedBranchInventory {
                    branch_id,
                    item_id,
                    quantity: self.quantity.sample(rng) as i32,
                });
            }
        }
        rows
    }
}

impl Default for BranchGenerator {
    fn default() -> Self {
        Self::from_config(&SeedConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::EnglishFaker;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn test_generate_branches() {
        let mut rng = StdRng::seed_from_u64(11);
        let managers = [4, 8, 15, 16, 23, 42];

        let branches = BranchGenerator::default()
            .generate(&managers, &EnglishFaker, &mut rng)
            .unwrap();

        assert_eq!(branches.len(), 100);
        for branch in &branches {
            assert!((50..=500).contains(&branch.capacity));
            assert!(managers.contains(&branch.manager_id));
            assert!(!branch.address.is_empty());
        }
    }

    #[test]
    fn test_branches_need_managers() {
        let mut rng = StdRng::seed_from_u64(11);
        let err = BranchGenerator::default()
            .generate(&[], &EnglishFaker, &mut rng)
            .unwrap_err();

        assert!(matches!(err, SeedError::EmptyPool { pool: "managers" }));
    }

    #[test]
    fn test_inventory_is_full_cross_product() {
        let mut rng = StdRng::seed_from_u64(11);
        let branches: Vec<i32> = (1..=100).collect();
        let items = [1, 2, 3, 4, 5];

        let rows = BranchGenerator::default().generate_inventory(&branches, &items, &mut rng);

        assert_eq!(rows.len(), 500);
        let pairs: HashSet<_> = rows.iter().map(|r| (r.branch_id, r.item_id)).collect();
        assert_eq!(pairs.len(), 500);
        assert!(rows.iter().all(|r| (5..=50).contains(&r.quantity)));
    }
}
