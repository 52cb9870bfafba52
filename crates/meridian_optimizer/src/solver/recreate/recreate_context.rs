use rand::rngs::SmallRng;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    error::SolverError,
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        constraints::ConstraintManager,
        events::{EventHub, InsertionEvent},
        fleet_manager::FleetManager,
        insertion::{InsertionCalculator, InsertionData, InsertionTarget},
        recreate::break_scheduler,
        solution::{route::VehicleRoute, working_solution::WorkingSolution},
        state::StateManager,
    },
};

pub struct RecreateContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    pub constraints: &'a ConstraintManager,
    pub states: &'a StateManager,
    pub fleet: &'a mut FleetManager,
    pub events: &'a EventHub,
    pub rng: &'a mut SmallRng,
    pub thread_pool: &'a rayon::ThreadPool,
    /// Also evaluate moving a route to an available vehicle of another type.
    pub vehicle_switch: bool,
}

impl<'a> RecreateContext<'a> {
    /// Cheapest feasible insertion of the job in every route, and in a new route for every
    /// available vehicle type. Routes are evaluated on the thread pool.
    pub fn evaluate_insertions(&self, solution: &WorkingSolution, job_id: JobIdx) -> Vec<InsertionData> {
        let problem = self.problem;
        let states = self.states;
        let calculator = InsertionCalculator::new(problem, self.constraints);

        let switch_candidates: Vec<_> = if self.vehicle_switch {
            solution
                .routes()
                .iter()
                .map(|route| self.fleet.available_vehicles_excluding(route.vehicle()))
                .collect()
        } else {
            Vec::new()
        };
        let new_route_vehicles = self.fleet.available_vehicles();

        self.thread_pool.install(|| {
            let mut insertions: Vec<InsertionData> = solution
                .routes()
                .par_iter()
                .enumerate()
                .filter_map(|(route_index, route)| {
                    let target = InsertionTarget::Route(route_index);
                    let mut best =
                        calculator.calculate(route, target, Some(route.vehicle()), job_id, f64::INFINITY);

                    for &vehicle_id in switch_candidates.get(route_index).into_iter().flatten() {
                        let mut switched = route.clone();
                        switched.set_vehicle(problem, vehicle_id);
                        if states.update_route(problem, &mut switched).is_err() {
                            continue;
                        }

                        let best_cost = best.as_ref().map_or(f64::INFINITY, |data| data.cost);
                        if let Some(data) =
                            calculator.calculate(&switched, target, Some(route.vehicle()), job_id, best_cost)
                        {
                            best = Some(data);
                        }
                    }

                    best
                })
                .collect();

            insertions.par_extend(new_route_vehicles.par_iter().filter_map(|&vehicle_id| {
                let mut route = VehicleRoute::new(problem, vehicle_id);
                states.update_route(problem, &mut route).ok()?;
                calculator.calculate(&route, InsertionTarget::NewRoute, None, job_id, f64::INFINITY)
            }));

            insertions
        })
    }

    pub fn best_insertion(&self, solution: &WorkingSolution, job_id: JobIdx) -> Option<InsertionData> {
        self.evaluate_insertions(solution, job_id)
            .into_iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost))
    }

    /// Commits an insertion: opens or switches the route, places the activities and refreshes
    /// the route states.
    pub fn insert(&mut self, solution: &mut WorkingSolution, data: &InsertionData) -> Result<(), SolverError> {
        let route_index = match data.target {
            InsertionTarget::NewRoute => {
                self.fleet.lock(self.problem, data.vehicle_id)?;
                solution.add_route(VehicleRoute::new(self.problem, data.vehicle_id))
            }
            InsertionTarget::Route(route_index) => {
                let current_vehicle = solution.route(route_index).vehicle();
                if current_vehicle != data.vehicle_id {
                    self.fleet.unlock(current_vehicle);
                    self.fleet.lock(self.problem, data.vehicle_id)?;
                    solution
                        .route_mut(route_index)
                        .set_vehicle(self.problem, data.vehicle_id);
                }
                route_index
            }
        };

        solution.insert_job(route_index, data.job_id, &data.positions);
        self.states
            .update_route(self.problem, solution.route_mut(route_index))?;

        self.events.insertion.emit(&InsertionEvent::JobInserted {
            job_id: data.job_id,
            vehicle_id: data.vehicle_id,
            cost: data.cost,
        });

        Ok(())
    }

    pub fn start_insertion(&self, jobs: usize) {
        self.events
            .insertion
            .emit(&InsertionEvent::Started { unassigned: jobs });
    }

    /// Drops the routes left empty, releases their vehicles and schedules the breaks of the
    /// remaining routes.
    pub fn finish_insertion(&mut self, solution: &mut WorkingSolution) -> Result<(), SolverError> {
        let released = solution.remove_empty_routes();
        if !released.is_empty() {
            debug!(routes = released.len(), "dropped empty routes");
        }
        for vehicle_id in released {
            self.fleet.unlock(vehicle_id);
        }

        break_scheduler::schedule_breaks(self.problem, self.states, solution)?;

        self.events.insertion.emit(&InsertionEvent::Ended {
            unassigned: solution.unassigned_jobs().len(),
        });

        Ok(())
    }
}
