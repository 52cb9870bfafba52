use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

pub trait SelectSolution {
    fn select_solution<'a>(
        &self,
        population: &'a Population,
        rng: &mut impl rand::Rng,
    ) -> Option<&'a WorkingSolution>;
}
