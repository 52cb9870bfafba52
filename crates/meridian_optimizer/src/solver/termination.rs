use std::collections::VecDeque;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Criteria checked at the end of every iteration, the first one met stops the search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Termination {
    Iterations(usize),
    IterationsWithoutImprovement(usize),
    Duration(SignedDuration),
    /// Stops when the coefficient of variation of the best cost over the last `window`
    /// iterations falls below `threshold`.
    VariationCoefficient { threshold: f64, window: usize },
}

/// Progress of a running search, as seen by the termination criteria.
pub struct SearchProgress {
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
    best_costs: VecDeque<f64>,
    window: usize,
}

impl SearchProgress {
    pub fn new(terminations: &[Termination]) -> Self {
        let window = terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::VariationCoefficient { window, .. } => Some(*window),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        SearchProgress {
            start: Timestamp::now(),
            iteration: 0,
            iterations_without_improvement: 0,
            best_costs: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn iterations_without_improvement(&self) -> usize {
        self.iterations_without_improvement
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.start)
    }

    pub fn record(&mut self, improved: bool, best_cost: f64) {
        self.iteration += 1;
        if improved {
            self.iterations_without_improvement = 0;
        } else {
            self.iterations_without_improvement += 1;
        }

        if self.window > 0 {
            if self.best_costs.len() == self.window {
                self.best_costs.pop_front();
            }
            self.best_costs.push_back(best_cost);
        }
    }

    /// Share of the iteration or time budget already spent, the larger of the two. Zero when
    /// neither an iteration cap nor a duration is set.
    pub fn budget_spent(&self, terminations: &[Termination]) -> f64 {
        terminations
            .iter()
            .filter_map(|termination| match *termination {
                Termination::Iterations(max_iterations) if max_iterations > 0 => {
                    Some(self.iteration as f64 / max_iterations as f64)
                }
                Termination::Iterations(_) => Some(1.0),
                Termination::Duration(max_duration) => {
                    let budget = max_duration.as_secs_f64();
                    if budget > 0.0 {
                        Some(self.elapsed().as_secs_f64() / budget)
                    } else {
                        Some(1.0)
                    }
                }
                _ => None,
            })
            .fold(0.0, f64::max)
            .min(1.0)
    }

    fn variation_coefficient(&self, window: usize) -> Option<f64> {
        if window < 2 || self.best_costs.len() < window {
            return None;
        }

        let costs = self.best_costs.iter().skip(self.best_costs.len() - window);
        let mean = costs.clone().sum::<f64>() / window as f64;
        if mean == 0.0 {
            return Some(0.0);
        }

        let variance = costs.map(|cost| (cost - mean).powi(2)).sum::<f64>() / window as f64;
        Some(variance.sqrt() / mean.abs())
    }
}

impl Termination {
    pub fn is_met(&self, progress: &SearchProgress) -> bool {
        match *self {
            Termination::Iterations(max_iterations) => progress.iteration >= max_iterations,
            Termination::IterationsWithoutImprovement(max_iterations) => {
                progress.iterations_without_improvement >= max_iterations
            }
            Termination::Duration(max_duration) => progress.elapsed() > max_duration,
            Termination::VariationCoefficient { threshold, window } => {
                // Only evaluated once per full window.
                progress.iteration % window.max(1) == 0
                    && progress
                        .variation_coefficient(window)
                        .is_some_and(|coefficient| coefficient < threshold)
            }
        }
    }
}
