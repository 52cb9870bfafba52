use rayon::prelude::*;
use tracing::warn;

use crate::problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem};

pub trait JobDistance: Send + Sync {
    fn distance(&self, problem: &VehicleRoutingProblem, from: JobIdx, to: JobIdx) -> f64;
}

/// Average distance between every location of the first job and every location of the second.
#[derive(Default)]
pub struct AverageJobDistance;

impl JobDistance for AverageJobDistance {
    fn distance(&self, problem: &VehicleRoutingProblem, from: JobIdx, to: JobIdx) -> f64 {
        let mut total = 0.0;
        let mut count = 0;

        for from_location in problem.job(from).locations() {
            for to_location in problem.job(to).locations() {
                total += problem.distance(from_location, to_location);
                count += 1;
            }
        }

        if count == 0 { 0.0 } else { total / count as f64 }
    }
}

/// For every job, the other jobs ordered from the closest to the farthest. Lists are capped to
/// the `capacity` closest jobs when a capacity is given.
pub struct JobNeighborhoods {
    neighbors: Vec<Vec<JobIdx>>,
}

impl JobNeighborhoods {
    pub fn new<D>(problem: &VehicleRoutingProblem, distance: &D, capacity: Option<usize>) -> Self
    where
        D: JobDistance,
    {
        let jobs: Vec<JobIdx> = problem.job_indices().collect();

        let neighbors = jobs
            .par_iter()
            .map(|&job_id| {
                let mut others: Vec<(f64, JobIdx)> = jobs
                    .iter()
                    .filter(|&&other| other != job_id)
                    .map(|&other| (distance.distance(problem, job_id, other), other))
                    .collect();

                if let Some(capacity) = capacity.filter(|&capacity| capacity < others.len()) {
                    others.select_nth_unstable_by(capacity, |a, b| a.0.total_cmp(&b.0));
                    others.truncate(capacity);
                }

                others.sort_by(|a, b| a.0.total_cmp(&b.0));
                others.into_iter().map(|(_, other)| other).collect()
            })
            .collect();

        JobNeighborhoods { neighbors }
    }

    /// Number of neighbors memorized for `job_id`.
    pub fn memorized(&self, job_id: JobIdx) -> usize {
        self.neighbors[job_id.get()].len()
    }

    /// The `n` closest jobs of `job_id`, closest first. Asking for more jobs than memorized
    /// yields the memorized ones.
    pub fn nearest_neighbors(&self, n: usize, job_id: JobIdx) -> impl Iterator<Item = JobIdx> + '_ {
        let neighbors = &self.neighbors[job_id.get()];
        if n > neighbors.len() {
            warn!(
                requested = n,
                memorized = neighbors.len(),
                "requested more neighbors than memorized"
            );
        }

        neighbors.iter().take(n).copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_neighbors_are_sorted_by_distance() {
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            test_utils::create_basic_services(vec![0, 9, 2, 5]),
            test_utils::create_basic_vehicles(vec![0]),
        );

        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, None);

        let neighbors: Vec<_> = neighborhoods.nearest_neighbors(3, JobIdx::new(0)).collect();
        assert_eq!(neighbors, vec![JobIdx::new(2), JobIdx::new(3), JobIdx::new(1)]);
    }

    #[test]
    fn test_capacity_bounds_neighbors() {
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            test_utils::create_basic_services(vec![0, 9, 2, 5, 7]),
            test_utils::create_basic_vehicles(vec![0]),
        );

        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, Some(2));

        assert_eq!(neighborhoods.memorized(JobIdx::new(0)), 2);
        let neighbors: Vec<_> = neighborhoods.nearest_neighbors(5, JobIdx::new(0)).collect();
        assert_eq!(neighbors, vec![JobIdx::new(2), JobIdx::new(3)]);
    }

    #[test]
    fn test_shipment_distance_is_averaged() {
        let problem = test_utils::create_test_problem(
            test_utils::create_location_grid(1, 10),
            vec![
                test_utils::create_shipment("s", 0, 4, 1.0),
                test_utils::create_service_with_demand("a", 2, 1.0),
            ],
            test_utils::create_basic_vehicles(vec![0]),
        );

        let distance = AverageJobDistance.distance(&problem, JobIdx::new(0), JobIdx::new(1));
        assert_eq!(distance, 2.0);
    }
}
