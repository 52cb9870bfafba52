use rand::seq::SliceRandom;
use tracing::debug;

use crate::{
    error::SolverError,
    problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Inserts the jobs one by one in random order, each at its overall cheapest position.
#[derive(Default)]
pub struct BestInsertion;

impl RecreateSolution for BestInsertion {
    fn insert_jobs(
        &self,
        solution: &mut WorkingSolution,
        mut jobs: Vec<JobIdx>,
        context: &mut RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        context.start_insertion(jobs.len());
        jobs.shuffle(&mut *context.rng);

        let mut remaining = Vec::new();
        for job_id in jobs {
            match context.best_insertion(solution, job_id) {
                Some(data) => context.insert(solution, &data)?,
                None => {
                    debug!(job = solution.problem().job(job_id).id(), "no feasible insertion");
                    remaining.push(job_id);
                }
            }
        }

        context.finish_insertion(solution)?;
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        problem::capacity::Capacity,
        solver::{
            constraints::ConstraintManager,
            events::EventHub,
            fleet_manager::FleetManager,
            state::{StateId, StateManager},
        },
        test_utils,
    };

    use super::*;

    #[test]
    fn test_capacity_leaves_one_job_out() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 3),
            vec![
                test_utils::create_service_with_demand("a", 1, 4.0),
                test_utils::create_service_with_demand("b", 4, 4.0),
                test_utils::create_service_with_demand("c", 5, 4.0),
            ],
            test_utils::create_vehicles_with_capacity(vec![0], 10.0),
        ));
        let constraints = ConstraintManager::with_default_constraints();
        let states = StateManager::default();
        let events = EventHub::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut fleet = FleetManager::new(&problem, SmallRng::seed_from_u64(8)).unwrap();
        let thread_pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();

        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let jobs = problem.job_indices().collect();
        let mut context = RecreateContext {
            problem: &problem,
            constraints: &constraints,
            states: &states,
            fleet: &mut fleet,
            events: &events,
            rng: &mut rng,
            thread_pool: &thread_pool,
            vehicle_switch: false,
        };

        let remaining = BestInsertion.insert_jobs(&mut solution, jobs, &mut context).unwrap();

        assert_eq!(remaining.len(), 1);
        assert_eq!(solution.unassigned_jobs().len(), 1);
        assert_eq!(solution.routes().len(), 1);

        let route = &solution.routes()[0];
        assert_eq!(route.len(), 2);
        let load = route
            .states()
            .route_state::<Capacity>(StateId::LoadAtEnd)
            .unwrap();
        assert_eq!(load, &Capacity::from_vec(vec![8.0]));
        assert!(fleet.is_locked(route.vehicle()));
    }
}
