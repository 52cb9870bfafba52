use fxhash::FxHashSet;
use rand::{Rng, seq::IndexedRandom};
use tracing::debug;

use crate::{
    problem::{job::JobIdx, location::LocationIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::{route::VehicleRoute, working_solution::WorkingSolution},
    utils::dbscan::dbscan,
};

use super::{
    job_neighborhoods::JobNeighborhoods,
    ruin_context::{self, RuinContext},
    ruin_solution::RuinSolution,
};

const EPSILON_SAMPLES: usize = 30;

/// Clusters the activities of a route by density and removes one cluster, then moves on to the
/// route of a neighbor of the removed jobs until enough jobs are removed.
pub struct RuinCluster;

impl RuinSolution for RuinCluster {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            problem,
            neighborhoods,
            events,
            rng,
            num_jobs_to_remove,
        }: RuinContext<R>,
    ) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let target_count = num_jobs_to_remove.min(solution.assigned_jobs().count());
        let mut removed = Vec::with_capacity(target_count);
        if target_count == 0 {
            return removed;
        }

        let Some(mut target) = solution.random_assigned_job(rng) else {
            return removed;
        };

        let mut ruined_routes = FxHashSet::default();
        let mut cycle_candidates = FxHashSet::default();

        while removed.len() < target_count {
            let Some(route_index) = solution.route_of_job(target) else {
                break;
            };

            // A ruined route may be visited a second time, never a third.
            if !ruined_routes.insert(route_index) && !cycle_candidates.insert(route_index) {
                debug!(
                    removed = removed.len(),
                    requested = target_count,
                    "cluster ruin stopped on an already ruined route"
                );
                break;
            }

            let min_points = rng.random_range(1..3);
            let epsilon_factor = rng.random_range(0.5..=1.0);
            let clusters = cluster_route(
                problem,
                solution.route(route_index),
                min_points,
                epsilon_factor,
                rng,
            );

            if let Some(cluster) = clusters.choose(rng) {
                for &job_id in cluster {
                    if removed.len() >= target_count {
                        break;
                    }

                    if ruin_context::remove_job(solution, events, job_id) {
                        removed.push(job_id);
                    }
                }
            }

            let source = removed.choose(rng).copied().unwrap_or(target);
            match next_target(solution, neighborhoods, source, &ruined_routes) {
                Some(next) => target = next,
                None => break,
            }
        }

        removed
    }
}

/// Closest planned neighbor of `source`, preferring the routes not ruined yet.
fn next_target(
    solution: &WorkingSolution,
    neighborhoods: &JobNeighborhoods,
    source: JobIdx,
    ruined_routes: &FxHashSet<usize>,
) -> Option<JobIdx> {
    let memorized = neighborhoods.memorized(source);

    neighborhoods
        .nearest_neighbors(memorized, source)
        .find(|&job_id| {
            solution
                .route_of_job(job_id)
                .is_some_and(|route_index| !ruined_routes.contains(&route_index))
        })
        .or_else(|| {
            neighborhoods
                .nearest_neighbors(memorized, source)
                .find(|&job_id| !solution.is_unassigned(job_id))
        })
}

/// Groups the jobs of the route by the density of their activities. A job appears in at most
/// one cluster, noise jobs in none.
fn cluster_route<R>(
    problem: &VehicleRoutingProblem,
    route: &VehicleRoute,
    min_points: usize,
    epsilon_factor: f64,
    rng: &mut R,
) -> Vec<Vec<JobIdx>>
where
    R: Rng + ?Sized,
{
    let points: Vec<_> = route
        .activities()
        .iter()
        .filter_map(|activity| activity.job().map(|job_id| (job_id, activity.location())))
        .collect();

    if points.is_empty() {
        return Vec::new();
    }

    let epsilon = average_distance(problem, &points, rng) * epsilon_factor;
    let clusters = dbscan(points.len(), min_points, |index| {
        let (_, location) = points[index];
        points
            .iter()
            .enumerate()
            .filter(|(_, (_, other))| problem.distance(location, *other) <= epsilon)
            .map(|(other_index, _)| other_index)
            .collect()
    });

    clusters
        .into_iter()
        .map(|cluster| {
            let mut seen = FxHashSet::default();
            cluster
                .into_iter()
                .map(|index| points[index].0)
                .filter(|&job_id| seen.insert(job_id))
                .collect()
        })
        .collect()
}

/// Average distance over randomly sampled pairs of activities.
fn average_distance<R>(
    problem: &VehicleRoutingProblem,
    points: &[(JobIdx, LocationIdx)],
    rng: &mut R,
) -> f64
where
    R: Rng + ?Sized,
{
    if points.len() < 2 {
        return 0.0;
    }

    let total: f64 = (0..EPSILON_SAMPLES)
        .map(|_| {
            let from = rng.random_range(0..points.len());
            let to = rng.random_range(0..points.len());
            problem.distance(points[from].1, points[to].1)
        })
        .sum();

    total / EPSILON_SAMPLES as f64
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        solver::{events::EventHub, ruin::job_neighborhoods::AverageJobDistance},
        test_utils::{self, MockRng, TestRoute},
    };

    use super::*;

    fn create_problem() -> Arc<VehicleRoutingProblem> {
        // Two groups of jobs far apart on a line, one route per group.
        Arc::new(test_utils::create_test_problem(
            test_utils::create_locations(vec![
                (0.0, 0.0),
                (1.0, 0.0),
                (1.5, 0.0),
                (2.0, 0.0),
                (50.0, 0.0),
                (50.5, 0.0),
                (51.0, 0.0),
            ]),
            test_utils::create_basic_services(vec![1, 2, 3, 4, 5, 6]),
            test_utils::create_basic_vehicles(vec![0, 0]),
        ))
    }

    fn create_solution(problem: &Arc<VehicleRoutingProblem>) -> WorkingSolution {
        test_utils::create_test_working_solution(
            Arc::clone(problem),
            vec![
                TestRoute {
                    vehicle_id: 0,
                    service_ids: vec![0, 1, 2],
                },
                TestRoute {
                    vehicle_id: 1,
                    service_ids: vec![3, 4, 5],
                },
            ],
        )
    }

    #[test]
    fn test_cluster_route_splits_far_groups() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_locations(vec![
                (0.0, 0.0),
                (0.0, 1.0),
                (0.0, 1.5),
                (100.0, 1.0),
                (100.0, 1.5),
            ]),
            test_utils::create_basic_services(vec![1, 2, 3, 4]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1, 2, 3],
            }],
        );
        let mut rng = SmallRng::seed_from_u64(1);

        let mut clusters = cluster_route(&problem, solution.route(0), 2, 0.5, &mut rng);
        clusters.iter_mut().for_each(|cluster| cluster.sort());
        clusters.sort();

        assert_eq!(
            clusters,
            vec![
                vec![JobIdx::new(0), JobIdx::new(1)],
                vec![JobIdx::new(2), JobIdx::new(3)],
            ]
        );
    }

    #[test]
    fn test_removed_jobs_are_unassigned() {
        let problem = create_problem();
        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, None);
        let events = EventHub::default();

        for seed in 0..20 {
            let mut solution = create_solution(&problem);
            let mut rng = SmallRng::seed_from_u64(seed);

            let removed = RuinCluster.ruin_solution(
                &mut solution,
                RuinContext {
                    problem: &problem,
                    neighborhoods: &neighborhoods,
                    events: &events,
                    rng: &mut rng,
                    num_jobs_to_remove: 4,
                },
            );

            assert!(removed.len() <= 4);
            assert_eq!(solution.unassigned_jobs().len(), removed.len());
            for job_id in &removed {
                assert!(solution.is_unassigned(*job_id));
                assert_eq!(solution.route_of_job(*job_id), None);
            }
        }
    }

    #[test]
    fn test_second_visit_of_a_route_ends_the_ruin() {
        let problem = create_problem();
        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, None);
        let events = EventHub::default();
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1, 2, 3, 4, 5],
            }],
        );
        // zero draws: a single point is dense enough, every cluster holds one job
        let mut rng = MockRng::new(vec![0]);

        let removed = RuinCluster.ruin_solution(
            &mut solution,
            RuinContext {
                problem: &problem,
                neighborhoods: &neighborhoods,
                events: &events,
                rng: &mut rng,
                num_jobs_to_remove: 5,
            },
        );

        assert_eq!(removed.len(), 2);
        assert_eq!(solution.route(0).jobs().len(), 4);
        assert_eq!(solution.unassigned_jobs().len(), 2);
        for job_id in &removed {
            assert!(solution.is_unassigned(*job_id));
        }
    }

    #[test]
    fn test_moves_on_to_the_route_of_a_neighbor() {
        let problem = create_problem();
        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, None);
        let events = EventHub::default();
        let mut solution = create_solution(&problem);
        let mut rng = MockRng::new(vec![0]);

        let removed = RuinCluster.ruin_solution(
            &mut solution,
            RuinContext {
                problem: &problem,
                neighborhoods: &neighborhoods,
                events: &events,
                rng: &mut rng,
                num_jobs_to_remove: 3,
            },
        );

        assert_eq!(removed.len(), 3);
        assert!(solution.route(0).jobs().len() < 3);
        assert!(solution.route(1).jobs().len() < 3);
        assert_eq!(
            solution.route(0).jobs().len() + solution.route(1).jobs().len(),
            3
        );
    }

    #[test]
    fn test_nothing_to_remove_on_empty_solution() {
        let problem = create_problem();
        let neighborhoods = JobNeighborhoods::new(&problem, &AverageJobDistance, None);
        let events = EventHub::default();
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let mut rng = SmallRng::seed_from_u64(0);

        let removed = RuinCluster.ruin_solution(
            &mut solution,
            RuinContext {
                problem: &problem,
                neighborhoods: &neighborhoods,
                events: &events,
                rng: &mut rng,
                num_jobs_to_remove: 3,
            },
        );

        assert!(removed.is_empty());
    }
}
