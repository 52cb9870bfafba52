use std::f64::consts::LN_2;

use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

pub const DEFAULT_ALPHA: f64 = 0.15;

/// Threshold acceptance (Schrimpf et al. 2000). A solution is accepted when it is less than the
/// threshold above the best solution of the population. The threshold decays exponentially
/// with the progress of the search, measured against its iteration or time budget.
pub struct SchrimpfAcceptor {
    initial_threshold: f64,
    alpha: f64,
}

impl SchrimpfAcceptor {
    pub fn new(initial_threshold: f64, alpha: f64) -> Self {
        SchrimpfAcceptor {
            initial_threshold,
            alpha,
        }
    }

    /// Initial threshold from the costs of a random walk: half their standard deviation.
    pub fn calibrate(costs: &[f64]) -> f64 {
        if costs.len() < 2 {
            return 0.0;
        }

        let mean = costs.iter().sum::<f64>() / costs.len() as f64;
        let variance =
            costs.iter().map(|cost| (cost - mean).powi(2)).sum::<f64>() / (costs.len() - 1) as f64;

        variance.sqrt() / 2.0
    }

    pub fn threshold(&self, context: &AcceptSolutionContext) -> f64 {
        let progress = context.progress.clamp(0.0, 1.0);

        self.initial_threshold * (-LN_2 * progress / self.alpha).exp()
    }
}

impl AcceptSolution for SchrimpfAcceptor {
    fn accept(
        &mut self,
        population: &mut Population,
        solution: &WorkingSolution,
        context: AcceptSolutionContext,
    ) -> bool {
        if !population.is_full() {
            population.push(solution.clone());
            return true;
        }

        let (Some(best), Some(worst)) = (population.best(), population.worst_index()) else {
            return false;
        };

        if solution.cost() - best.cost() < self.threshold(&context) {
            population.replace(worst, solution.clone());
            true
        } else {
            false
        }
    }
}
