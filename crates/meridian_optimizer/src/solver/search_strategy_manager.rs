use rand::Rng;

use crate::error::SolverError;

use super::search_strategy::SearchStrategy;

/// Registered strategies and their selection weights.
#[derive(Default, Clone)]
pub struct SearchStrategyManager {
    strategies: Vec<SearchStrategy>,
    weights: Vec<f64>,
    weight_sum: f64,
}

impl SearchStrategyManager {
    pub fn add(&mut self, strategy: SearchStrategy, weight: f64) -> Result<(), SolverError> {
        if self.position(strategy.id()).is_some() {
            return Err(SolverError::DuplicateStrategy(strategy.id().to_owned()));
        }
        check_weight(strategy.id(), weight)?;

        self.strategies.push(strategy);
        self.weights.push(weight);
        self.weight_sum += weight;

        Ok(())
    }

    pub fn set_weight(&mut self, id: &str, weight: f64) -> Result<(), SolverError> {
        let index = self
            .position(id)
            .ok_or_else(|| SolverError::UnknownStrategy(id.to_owned()))?;
        check_weight(id, weight)?;

        self.weights[index] = weight;
        self.weight_sum = self.weights.iter().sum();

        Ok(())
    }

    pub fn weight(&self, id: &str) -> Option<f64> {
        self.position(id).map(|index| self.weights[index])
    }

    pub fn strategies(&self) -> &[SearchStrategy] {
        &self.strategies
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Draws a strategy proportionally to its weight. When every weight is zero the draw is
    /// uniform.
    pub fn pick_random<R>(&self, rng: &mut R) -> Result<&SearchStrategy, SolverError>
    where
        R: Rng + ?Sized,
    {
        if self.strategies.is_empty() {
            return Err(SolverError::NoSearchStrategy);
        }

        if self.weight_sum <= 0.0 {
            let index = rng.random_range(0..self.strategies.len());
            return Ok(&self.strategies[index]);
        }

        let draw = rng.random::<f64>() * self.weight_sum;
        let mut cumulated = 0.0;
        for (strategy, weight) in self.strategies.iter().zip(&self.weights) {
            cumulated += weight;
            if draw < cumulated {
                return Ok(strategy);
            }
        }

        // Rounding on the last cumulated weight.
        self.strategies
            .iter()
            .zip(&self.weights)
            .rev()
            .find(|(_, weight)| **weight > 0.0)
            .map(|(strategy, _)| strategy)
            .ok_or(SolverError::NoSearchStrategy)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.strategies
            .iter()
            .position(|strategy| strategy.id() == id)
    }
}

fn check_weight(id: &str, weight: f64) -> Result<(), SolverError> {
    if weight < 0.0 || weight.is_nan() {
        return Err(SolverError::NegativeWeight {
            id: id.to_owned(),
            weight,
        });
    }

    Ok(())
}
