use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

#[derive(Clone, Copy, Debug)]
pub struct AcceptSolutionContext {
    pub iteration: usize,
    /// Share of the search budget already spent, in `[0, 1]`.
    pub progress: f64,
}

pub trait AcceptSolution {
    /// Decides whether `solution` joins the population, evicting another solution when the
    /// population is full. Returns whether it was accepted.
    fn accept(
        &mut self,
        population: &mut Population,
        solution: &WorkingSolution,
        context: AcceptSolutionContext,
    ) -> bool;
}
