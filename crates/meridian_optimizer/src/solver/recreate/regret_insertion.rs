use std::cmp::Ordering;

use tracing::debug;

use crate::{
    error::SolverError,
    problem::job::JobIdx,
    solver::{insertion::InsertionData, solution::working_solution::WorkingSolution},
};

use super::{recreate_context::RecreateContext, recreate_solution::RecreateSolution};

/// Regret of a job with a single feasible route, such jobs are inserted first.
const REGRET_WITHOUT_ALTERNATIVE: f64 = f64::MAX;

/// Repeatedly inserts the job with the largest gap between its best and second best insertion,
/// the job with the cheapest best insertion wins ties.
#[derive(Default)]
pub struct RegretInsertion;

struct ScoredInsertion {
    regret: f64,
    best: InsertionData,
}

impl RegretInsertion {
    fn score(mut insertions: Vec<InsertionData>) -> Option<ScoredInsertion> {
        insertions.sort_unstable_by(|a, b| a.cost.total_cmp(&b.cost));
        let mut insertions = insertions.into_iter();
        let best = insertions.next()?;
        let regret = insertions
            .next()
            .map_or(REGRET_WITHOUT_ALTERNATIVE, |second| second.cost - best.cost);

        Some(ScoredInsertion { regret, best })
    }

    fn is_preferred(candidate: &ScoredInsertion, current: &ScoredInsertion) -> bool {
        match candidate.regret.total_cmp(&current.regret) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => candidate.best.cost < current.best.cost,
        }
    }
}

impl RecreateSolution for RegretInsertion {
    fn insert_jobs(
        &self,
        solution: &mut WorkingSolution,
        jobs: Vec<JobIdx>,
        context: &mut RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        context.start_insertion(jobs.len());

        let mut pending = jobs;
        let mut remaining = Vec::new();

        while !pending.is_empty() {
            let mut selected: Option<ScoredInsertion> = None;
            let mut still_pending = Vec::with_capacity(pending.len());

            for job_id in pending {
                match Self::score(context.evaluate_insertions(solution, job_id)) {
                    Some(scored) => {
                        still_pending.push(job_id);
                        if selected
                            .as_ref()
                            .is_none_or(|current| Self::is_preferred(&scored, current))
                        {
                            selected = Some(scored);
                        }
                    }
                    None => {
                        debug!(job = solution.problem().job(job_id).id(), "no feasible insertion");
                        remaining.push(job_id);
                    }
                }
            }

            let Some(selected) = selected else {
                break;
            };

            context.insert(solution, &selected.best)?;
            still_pending.retain(|&job_id| job_id != selected.best.job_id);
            pending = still_pending;
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
        problem::vehicle::VehicleIdx,
        solver::{
            constraints::ConstraintManager,
            events::EventHub,
            fleet_manager::FleetManager,
            insertion::InsertionTarget,
            state::StateManager,
        },
        test_utils,
    };

    use super::*;

    fn insertion(job: usize, cost: f64) -> InsertionData {
        InsertionData {
            job_id: JobIdx::new(job),
            target: InsertionTarget::NewRoute,
            vehicle_id: VehicleIdx::new(0),
            positions: smallvec::smallvec![0],
            cost,
        }
    }

    #[test]
    fn test_regret_is_gap_to_second_best() {
        let scored =
            RegretInsertion::score(vec![insertion(0, 9.0), insertion(0, 4.0), insertion(0, 6.0)])
                .unwrap();

        assert_eq!(scored.best.cost, 4.0);
        assert_eq!(scored.regret, 2.0);
        assert!(RegretInsertion::score(Vec::new()).is_none());
    }

    #[test]
    fn test_single_option_has_the_highest_regret() {
        let single = RegretInsertion::score(vec![insertion(0, 100.0)]).unwrap();
        let pair = RegretInsertion::score(vec![insertion(1, 1.0), insertion(1, 50.0)]).unwrap();

        assert!(RegretInsertion::is_preferred(&single, &pair));
        assert!(!RegretInsertion::is_preferred(&pair, &single));
    }

    #[test]
    fn test_ties_go_to_the_cheapest_job() {
        let cheap = RegretInsertion::score(vec![insertion(0, 1.0), insertion(0, 3.0)]).unwrap();
        let expensive = RegretInsertion::score(vec![insertion(1, 5.0), insertion(1, 7.0)]).unwrap();

        assert!(RegretInsertion::is_preferred(&cheap, &expensive));
        assert!(!RegretInsertion::is_preferred(&expensive, &cheap));
    }

    #[test]
    fn test_inserts_every_job_with_enough_vehicles() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(3, 3),
            vec![
                test_utils::create_service_with_demand("a", 1, 4.0),
                test_utils::create_service_with_demand("b", 5, 4.0),
                test_utils::create_service_with_demand("c", 8, 4.0),
                test_utils::create_shipment("s", 2, 6, 2.0),
            ],
            test_utils::create_vehicles_with_capacity(vec![0, 0], 10.0),
        ));
        let constraints = ConstraintManager::with_default_constraints();
        let states = StateManager::default();
        let events = EventHub::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut fleet = FleetManager::new(&problem, SmallRng::seed_from_u64(2)).unwrap();
        let thread_pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();

        let mut solution = WorkingSolution::new(Arc::clone(&problem));
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

        let remaining = RegretInsertion
            .insert_jobs(&mut solution, problem.job_indices().collect(), &mut context)
            .unwrap();

        assert!(remaining.is_empty());
        assert!(!solution.has_unassigned());
        assert_eq!(solution.routes().len(), 2);
    }
}
