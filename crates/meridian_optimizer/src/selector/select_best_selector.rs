use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

use super::select_solution::SelectSolution;

pub struct SelectBestSelector;

impl SelectSolution for SelectBestSelector {
    fn select_solution<'a>(
        &self,
        population: &'a Population,
        _: &mut impl rand::Rng,
    ) -> Option<&'a WorkingSolution> {
        population.best()
    }
}
