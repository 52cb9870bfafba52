use crate::{
    error::StateError,
    solver::{solution::working_solution::WorkingSolution, state::StateId},
};

/// Objective of a solution. Route states must be up to date.
pub trait SolutionCostCalculator: Send + Sync {
    fn calculate(&self, solution: &WorkingSolution) -> Result<f64, StateError>;
}

/// Accumulated route costs, fixed costs of the used vehicles and a penalty per unassigned job.
#[derive(Default)]
pub struct DefaultSolutionCost;

impl SolutionCostCalculator for DefaultSolutionCost {
    fn calculate(&self, solution: &WorkingSolution) -> Result<f64, StateError> {
        let problem = solution.problem();

        let mut cost = 0.0;
        for route in solution.non_empty_routes_iter() {
            cost += route.states().route_state::<f64>(StateId::Costs)?;
            cost += problem.vehicle(route.vehicle()).fixed_cost();
        }

        cost += solution.unassigned_jobs().len() as f64 * problem.unassigned_job_penalty();

        Ok(cost)
    }
}
