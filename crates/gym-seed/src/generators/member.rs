//! Member generation with unique phone numbers.

use std::collections::HashSet;

use rand::Rng;

use super::DataFaker;
use crate::config::Span;

/// Every 10-digit number without a leading zero.
pub const PHONE_NUMBERS: Span = Span::new(1_000_000_000, 9_999_999_999);

/// Generated member data ready for database insertion.
#[derive(Debug, Clone)]
pub struct GeneratedMember {
    pub name: String,
    pub phone: i64,
    /// City the member lives in.
    pub address: String,
}

/// Generates members whose phone numbers are unique within the batch.
pub struct MemberGenerator {
    count: usize,
}

impl MemberGenerator {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    /// Generates exactly `count` members, redrawing a phone number whenever it
    /// collides with one already drawn.
    pub fn generate(&self, faker: &impl DataFaker, rng: &mut impl Rng) -> Vec<GeneratedMember> {
        let mut phones = HashSet::with_capacity(self.count);
        let mut members = Vec::with_capacity(self.count);

        while members.len() < self.count {
            let phone = PHONE_NUMBERS.sample(rng);
            if phones.insert(phone) {
                members.push(GeneratedMember {
                    name: faker.name(rng),
                    phone,
                    address: faker.city(rng),
                });
            }
        }

        members
    }
}

impl Default for MemberGenerator {
    fn default() -> Self {
        Self::new(10_000)
    }
}
