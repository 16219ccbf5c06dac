use std::{fmt::Debug, num::NonZeroU8};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// A single six-sided die value, always in `1..=6`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Die {
    value: NonZeroU8,
}

impl Die {
    pub const SIX: Die = Die::from_number(6);

    pub const ALL: [Die; 6] = [
        Die::from_number(1), Die::from_number(2), Die::from_number(3),
        Die::from_number(4), Die::from_number(5), Die::from_number(6),
    ];

    /// Panics at compile time when used in a const with a value outside `1..=6`.
    const fn from_number(value: u8) -> Self {
        assert!(value >= 1 && value <= 6);
        match NonZeroU8::new(value) {
            Some(value) => Die { value },
            None => panic!("die value must be non-zero"),
        }
    }

    pub fn new(value: u8) -> Result<Self, GameError> {
        match value {
            1..=6 => Ok(Die::from_number(value)),
            _ => Err(GameError::DieOutOfRange(value)),
        }
    }

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Die::from_number(rng.random_range(1..=6))
    }

    pub fn value(&self) -> u8 {
        self.value.get()
    }

    pub fn is_six(&self) -> bool {
        self.value.get() == 6
    }
}

impl TryFrom<u8> for Die {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Die::new(value)
    }
}

impl From<Die> for u8 {
    fn from(die: Die) -> Self {
        die.value()
    }
}

impl Debug for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Die({})", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_die_range() {
        for v in 1..=6 {
            assert_eq!(Die::new(v).unwrap().value(), v);
        }
        assert_eq!(Die::new(0), Err(GameError::DieOutOfRange(0)));
        assert_eq!(Die::new(7), Err(GameError::DieOutOfRange(7)));
        assert!(Die::SIX.is_six());
        assert!(!Die::ALL[0].is_six());
    }

    #[test]
    fn test_die_roll() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = [false; 6];
        for _ in 0..200 {
            let die = Die::roll(&mut rng);
            assert!((1..=6).contains(&die.value()));
            seen[die.value() as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
