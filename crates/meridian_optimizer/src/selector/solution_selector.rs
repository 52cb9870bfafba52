use crate::solver::solution::{population::Population, working_solution::WorkingSolution};

use super::{
    select_best_selector::SelectBestSelector, select_random_selector::SelectRandomSelector,
    select_solution::SelectSolution,
};

pub enum SolutionSelector {
    SelectBest(SelectBestSelector),
    SelectRandom(SelectRandomSelector),
}

impl SelectSolution for SolutionSelector {
    fn select_solution<'a>(
        &self,
        population: &'a Population,
        rng: &mut impl rand::Rng,
    ) -> Option<&'a WorkingSolution> {
        match self {
            SolutionSelector::SelectBest(selector) => selector.select_solution(population, rng),
            SolutionSelector::SelectRandom(selector) => selector.select_solution(population, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::test_utils;

    use super::*;

    #[test]
    fn test_empty_population_selects_nothing() {
        let population = Population::new(2);
        let mut rng = SmallRng::seed_from_u64(0);

        assert!(
            SolutionSelector::SelectBest(SelectBestSelector)
                .select_solution(&population, &mut rng)
                .is_none()
        );
        assert!(
            SolutionSelector::SelectRandom(SelectRandomSelector)
                .select_solution(&population, &mut rng)
                .is_none()
        );
    }

    #[test]
    fn test_select_best() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut population = Population::new(3);
        for cost in [8.0, 3.0, 5.0] {
            let mut solution = WorkingSolution::new(Arc::clone(&problem));
            solution.set_cost(cost);
            population.push(solution);
        }
        let mut rng = SmallRng::seed_from_u64(0);

        let selected = SolutionSelector::SelectBest(SelectBestSelector)
            .select_solution(&population, &mut rng)
            .map(WorkingSolution::cost);
        assert_eq!(selected, Some(3.0));
    }
}
