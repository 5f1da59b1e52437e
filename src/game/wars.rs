//! Active wars between countries
//!
//! Each war is stored once under its normalised (lower, higher) pair, which
//! makes `is_at_war(a, b) == is_at_war(b, a)` hold by construction.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::game::faction::Country;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarSet {
    pairs: AHashSet<(Country, Country)>,
}

fn normalise(a: Country, b: Country) -> (Country, Country) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl WarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the pair was already at war or `a == b`
    pub fn declare(&mut self, a: Country, b: Country) -> bool {
        a != b && self.pairs.insert(normalise(a, b))
    }

    /// Returns false if the pair was not at war
    pub fn make_peace(&mut self, a: Country, b: Country) -> bool {
        self.pairs.remove(&normalise(a, b))
    }

    pub fn is_at_war(&self, a: Country, b: Country) -> bool {
        self.pairs.contains(&normalise(a, b))
    }

    /// Countries currently at war with `country`
    pub fn enemies_of(&self, country: Country) -> Vec<Country> {
        let mut enemies: Vec<Country> = self
            .pairs
            .iter()
            .filter_map(|&(a, b)| match (a == country, b == country) {
                (true, _) => Some(b),
                (_, true) => Some(a),
                _ => None,
            })
            .collect();
        enemies.sort();
        enemies
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_war_is_symmetric() {
        let mut wars = WarSet::new();
        assert!(wars.declare(Country::France, Country::Germany));
        assert!(wars.is_at_war(Country::Germany, Country::France));
        assert!(wars.is_at_war(Country::France, Country::Germany));
        assert!(!wars.declare(Country::Germany, Country::France));
        assert_eq!(wars.len(), 1);
    }

    #[test]
    fn test_peace_removes_pair() {
        let mut wars = WarSet::new();
        wars.declare(Country::Japan, Country::China);
        assert!(wars.make_peace(Country::China, Country::Japan));
        assert!(!wars.is_at_war(Country::Japan, Country::China));
        assert!(!wars.make_peace(Country::China, Country::Japan));
        assert!(wars.is_empty());
    }

    #[test]
    fn test_no_war_with_self() {
        let mut wars = WarSet::new();
        assert!(!wars.declare(Country::Italy, Country::Italy));
        assert!(wars.is_empty());
    }

    #[test]
    fn test_enemies_of() {
        let mut wars = WarSet::new();
        wars.declare(Country::Russia, Country::Germany);
        wars.declare(Country::Germany, Country::UnitedKingdom);
        wars.declare(Country::Japan, Country::China);
        assert_eq!(
            wars.enemies_of(Country::Germany),
            vec![Country::UnitedKingdom, Country::Russia]
        );
    }
}
