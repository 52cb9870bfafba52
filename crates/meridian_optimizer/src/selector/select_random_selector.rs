use rand::seq::IndexedRandom;

use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

use super::select_solution::SelectSolution;

pub struct SelectRandomSelector;

impl SelectSolution for SelectRandomSelector {
    fn select_solution<'a>(
        &self,
        population: &'a Population,
        rng: &mut impl rand::Rng,
    ) -> Option<&'a WorkingSolution> {
        population.solutions().choose(rng)
    }
}
