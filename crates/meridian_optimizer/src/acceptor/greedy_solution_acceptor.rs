use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

use super::accept_solution::{AcceptSolution, AcceptSolutionContext};

/// Fills the population, then only replaces the worst solution by a strictly cheaper one.
pub struct GreedySolutionAcceptor;

impl AcceptSolution for GreedySolutionAcceptor {
    fn accept(
        &mut self,
        population: &mut Population,
        solution: &WorkingSolution,
        _: AcceptSolutionContext,
    ) -> bool {
        if !population.is_full() {
            population.push(solution.clone());
            return true;
        }

        match population.worst_index() {
            Some(worst) if solution.cost() < population.solutions()[worst].cost() => {
                population.replace(worst, solution.clone());
                true
            }
            _ => false,
        }
    }
}
