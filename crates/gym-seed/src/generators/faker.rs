//! Injectable source of human-looking names and addresses.

use fake::{
    Fake,
    faker::{
        address::en::{BuildingNumber, CityName, StreetName},
        name::en::Name,
    },
};
use rand::Rng;

/// Produces display strings for generated rows.
///
/// All randomness comes from the caller's rng, so a seeded rng gives the same
/// strings on every run.
pub trait DataFaker {
    fn name<R: Rng + ?Sized>(&self, rng: &mut R) -> String;
    fn street_address<R: Rng + ?Sized>(&self, rng: &mut R) -> String;
    fn city<R: Rng + ?Sized>(&self, rng: &mut R) -> String;
}

/// [`DataFaker`] backed by the `fake` crate's English locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishFaker;

impl DataFaker for EnglishFaker {
    fn name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        Name().fake_with_rng(rng)
    }

    fn street_address<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        format!("{number} {street}")
    }

    fn city<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        CityName().fake_with_rng(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_english_faker_fills_fields() {
        let mut rng = StdRng::seed_from_u64(1);
        let faker = EnglishFaker;

        assert!(!faker.name(&mut rng).is_empty());
        assert!(faker.street_address(&mut rng).contains(' '));
        assert!(!faker.city(&mut rng).is_empty());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let faker = EnglishFaker;
        let sample = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..5)
                .map(|_| faker.name(&mut rng))
                .collect::<Vec<_>>()
        };

        assert_eq!(sample(42), sample(42));
    }
}
