use rand::Rng;
use serde::{Deserialize, Serialize};

/// How many jobs a single ruin removes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RuinShare {
    /// Share of all the jobs of the problem, rounded up.
    Fraction(f64),
    Fixed(usize),
    /// Uniformly drawn in `min..=max`.
    Range { min: usize, max: usize },
}

impl Default for RuinShare {
    fn default() -> Self {
        RuinShare::Range { min: 10, max: 30 }
    }
}

impl RuinShare {
    pub fn num_jobs<R>(&self, total_jobs: usize, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        match *self {
            RuinShare::Fraction(fraction) => (total_jobs as f64 * fraction.max(0.0)).ceil() as usize,
            RuinShare::Fixed(count) => count,
            RuinShare::Range { min, max } => rng.random_range(min..=max.max(min)),
        }
    }

    /// Largest count `num_jobs` can return for `total_jobs`.
    pub fn max_jobs(&self, total_jobs: usize) -> usize {
        match *self {
            RuinShare::Fraction(fraction) => (total_jobs as f64 * fraction.max(0.0)).ceil() as usize,
            RuinShare::Fixed(count) => count,
            RuinShare::Range { min, max } => max.max(min),
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            RuinShare::Fraction(fraction) => (0.0..=1.0).contains(&fraction),
            RuinShare::Fixed(_) => true,
            RuinShare::Range { min, max } => min <= max,
        }
    }
}
