use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

use super::{
    accept_solution::{AcceptSolution, AcceptSolutionContext},
    greedy_solution_acceptor::GreedySolutionAcceptor,
    schrimpf_acceptor::SchrimpfAcceptor,
};

pub enum SolutionAcceptor {
    Greedy(GreedySolutionAcceptor),
    Schrimpf(SchrimpfAcceptor),
    /// Accepts every solution, the oldest one is evicted when the population is full.
    Any,
}

impl AcceptSolution for SolutionAcceptor {
    fn accept(
        &mut self,
        population: &mut Population,
        solution: &WorkingSolution,
        context: AcceptSolutionContext,
    ) -> bool {
        match self {
            SolutionAcceptor::Greedy(acceptor) => acceptor.accept(population, solution, context),
            SolutionAcceptor::Schrimpf(acceptor) => acceptor.accept(population, solution, context),
            SolutionAcceptor::Any => {
                if population.is_full() && !population.is_empty() {
                    population.remove(0);
                }
                population.push(solution.clone());
                true
            }
        }
    }
}
