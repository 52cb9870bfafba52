use fxhash::FxHashSet;

use crate::{
    error::SolverError, problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

/// Checks that every job of the problem is either planned exactly once or unassigned.
pub fn verify_solution(solution: &WorkingSolution) -> Result<(), SolverError> {
    let problem = solution.problem();
    let mut planned = FxHashSet::<JobIdx>::default();

    for route in solution.routes() {
        for job_id in route.jobs() {
            if !planned.insert(job_id) {
                return Err(SolverError::Verification(format!(
                    "job `{}` is planned in more than one route",
                    problem.job(job_id).id()
                )));
            }

            if solution.is_unassigned(job_id) {
                return Err(SolverError::Verification(format!(
                    "job `{}` is both planned and unassigned",
                    problem.job(job_id).id()
                )));
            }
        }
    }

    let accounted = planned.len() + solution.unassigned_jobs().len();
    if accounted != problem.jobs().len() {
        return Err(SolverError::Verification(format!(
            "{} jobs accounted for, the problem has {}",
            accounted,
            problem.jobs().len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_utils::{self, TestRoute};

    use super::*;

    #[test]
    fn test_conserved_jobs() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1, 2, 3]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![2, 0],
            }],
        );

        assert!(verify_solution(&solution).is_ok());
    }

    #[test]
    fn test_job_both_planned_and_unassigned() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(2, 2),
            test_utils::create_basic_services(vec![1, 2]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1],
            }],
        );
        solution.mark_unassigned(JobIdx::new(1));

        assert!(matches!(
            verify_solution(&solution),
            Err(SolverError::Verification(_))
        ));
    }
}
