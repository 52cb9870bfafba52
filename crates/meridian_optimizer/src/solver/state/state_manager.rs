use std::sync::Arc;

use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{route::VehicleRoute, working_solution::WorkingSolution},
        state::{
            RouteStates,
            updaters::{
                self, UpdateCosts, UpdateLatestOperationStart, UpdateLoads, UpdateMaxLoads,
                UpdateRequiredSkills,
            },
        },
    },
};

/// Producer of route or activity states, run each time a route changes.
pub trait StateUpdater: Send + Sync {
    fn update(
        &self,
        problem: &VehicleRoutingProblem,
        route: &VehicleRoute,
        states: &mut RouteStates,
    ) -> Result<(), StateError>;
}

/// Registry of state updaters. Updaters run in registration order and may read the states
/// written by the ones registered before them.
#[derive(Clone)]
pub struct StateManager {
    updaters: Vec<Arc<dyn StateUpdater>>,
}

impl Default for StateManager {
    fn default() -> Self {
        StateManager {
            updaters: vec![
                Arc::new(UpdateLoads),
                Arc::new(UpdateMaxLoads),
                Arc::new(UpdateLatestOperationStart),
                Arc::new(UpdateRequiredSkills),
                Arc::new(UpdateCosts),
            ],
        }
    }
}

impl StateManager {
    pub fn add_updater(&mut self, updater: Arc<dyn StateUpdater>) {
        self.updaters.push(updater);
    }

    /// Refreshes the schedule of the route and recomputes all of its states.
    pub fn update_route(
        &self,
        problem: &VehicleRoutingProblem,
        route: &mut VehicleRoute,
    ) -> Result<(), StateError> {
        updaters::update_schedule(problem, route);

        let mut states = RouteStates::new(route.len());
        for updater in &self.updaters {
            updater.update(problem, route, &mut states)?;
        }
        route.replace_states(states);

        Ok(())
    }

    /// Refreshes every route whose states went stale.
    pub fn update_solution(&self, solution: &mut WorkingSolution) -> Result<(), StateError> {
        let problem = Arc::clone(solution.problem());
        for route in solution.routes_mut() {
            if route.states().is_stale() {
                self.update_route(&problem, route)?;
            }
        }

        Ok(())
    }
}
