//! Fixed reference data inserted on every run.

pub const SERVICE_TYPES: &[&str] = &[
    "Yoga",
    "Zumba",
    "Weightlifting",
    "Cardio",
    "Pilates",
    "Crossfit",
    "Boxing",
];

pub const INVENTORY_ITEMS: &[&str] = &[
    "Treadmill",
    "Dumbbell Set",
    "Yoga Mat",
    "Bench Press",
    "Kettlebell",
];

/// A membership tier as stored in `membership_plans`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipPlan {
    pub tier_name: &'static str,
    pub fee: i32,
    /// Length in months.
    pub duration: i32,
}

impl MembershipPlan {
    const fn new(tier_name: &'static str, fee: i32, duration: i32) -> Self {
        Self {
            tier_name,
            fee,
            duration,
        }
    }
}

pub const MEMBERSHIP_PLANS: &[MembershipPlan] = &[
    MembershipPlan::new("Basic", 1000, 1),
    MembershipPlan::new("Standard", 2500, 3),
    MembershipPlan::new("Premium", 4500, 6),
    MembershipPlan::new("Elite", 8000, 12),
];
