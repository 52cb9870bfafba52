use super::working_solution::WorkingSolution;

/// Pool of solutions the search starts its iterations from. Acceptors decide what enters it and
/// what gets evicted.
#[derive(Clone)]
pub struct Population {
    max_size: usize,
    solutions: Vec<WorkingSolution>,
}

impl Population {
    pub fn new(max_size: usize) -> Self {
        Population {
            max_size,
            solutions: Vec::with_capacity(max_size),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn solutions(&self) -> &[WorkingSolution] {
        &self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.solutions.len() >= self.max_size
    }

    pub fn best(&self) -> Option<&WorkingSolution> {
        self.solutions
            .iter()
            .min_by(|a, b| a.cost().total_cmp(&b.cost()))
    }

    pub fn worst_index(&self) -> Option<usize> {
        self.solutions
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.cost().total_cmp(&b.cost()))
            .map(|(index, _)| index)
    }

    pub(crate) fn push(&mut self, solution: WorkingSolution) {
        self.solutions.push(solution);
    }

    pub(crate) fn replace(&mut self, index: usize, solution: WorkingSolution) {
        self.solutions[index] = solution;
    }

    pub(crate) fn remove(&mut self, index: usize) -> WorkingSolution {
        self.solutions.remove(index)
    }

    pub fn into_solutions(self) -> Vec<WorkingSolution> {
        self.solutions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_utils;

    use super::*;

    #[test]
    fn test_best_and_worst() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1, 2]),
            test_utils::create_basic_vehicles(vec![0]),
        ));

        let mut population = Population::new(3);
        for cost in [20.0, 5.0, 12.0] {
            let mut solution = WorkingSolution::new(Arc::clone(&problem));
            solution.set_cost(cost);
            population.push(solution);
        }

        assert!(population.is_full());
        assert_eq!(population.best().map(WorkingSolution::cost), Some(5.0));
        assert_eq!(population.worst_index(), Some(0));
    }
}
