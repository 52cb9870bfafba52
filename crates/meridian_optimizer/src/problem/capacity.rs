use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

type Vector = SmallVec<[f64; 2]>;

/// Multi dimensional amount, used both for vehicle capacities and job demands.
///
/// Missing dimensions read as `0.0`, so a single dimension demand can be compared with a
/// vehicle that declares more dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Capacity(Vector);

impl Capacity {
    pub const EMPTY: Capacity = Capacity(Vector::new_const());

    pub fn from_vec(vec: Vec<f64>) -> Self {
        Capacity(SmallVec::from_vec(vec))
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        let mut vec = SmallVec::with_capacity(dimensions);
        vec.resize(dimensions, 0.0);
        Capacity(vec)
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&value| value == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Whether every dimension of `self` is lower or equal to the matching dimension of `limit`.
    pub fn fits_in(&self, limit: &Capacity) -> bool {
        let len = self.len().max(limit.len());
        (0..len).all(|index| self.get(index) <= limit.get(index))
    }

    pub fn update_max(&mut self, other: &Capacity) {
        self.ensure_len(other.len());
        for (index, value) in self.0.iter_mut().enumerate() {
            *value = value.max(other.get(index));
        }
    }

    pub fn max(&self, other: &Capacity) -> Capacity {
        let mut result = self.clone();
        result.update_max(other);
        result
    }

    pub fn abs(&self) -> Capacity {
        Capacity(self.0.iter().map(|value| value.abs()).collect())
    }

    fn ensure_len(&mut self, len: usize) {
        if self.0.len() < len {
            self.0.resize(len, 0.0);
        }
    }
}

impl PartialEq for Capacity {
    fn eq(&self, other: &Self) -> bool {
        let len = self.len().max(other.len());
        (0..len).all(|index| self.get(index) == other.get(index))
    }
}

impl AddAssign<&Capacity> for Capacity {
    fn add_assign(&mut self, rhs: &Capacity) {
        self.ensure_len(rhs.len());
        for (value, other) in self.0.iter_mut().zip(rhs.iter()) {
            *value += other;
        }
    }
}

impl SubAssign<&Capacity> for Capacity {
    fn sub_assign(&mut self, rhs: &Capacity) {
        self.ensure_len(rhs.len());
        for (value, other) in self.0.iter_mut().zip(rhs.iter()) {
            *value -= other;
        }
    }
}

impl Add<&Capacity> for &Capacity {
    type Output = Capacity;

    fn add(self, rhs: &Capacity) -> Self::Output {
        let mut result = self.clone();
        result += rhs;
        result
    }
}

impl Sub<&Capacity> for &Capacity {
    type Output = Capacity;

    fn sub(self, rhs: &Capacity) -> Self::Output {
        let mut result = self.clone();
        result -= rhs;
        result
    }
}

impl Neg for &Capacity {
    type Output = Capacity;

    fn neg(self) -> Self::Output {
        Capacity(self.0.iter().map(|value| -value).collect())
    }
}
