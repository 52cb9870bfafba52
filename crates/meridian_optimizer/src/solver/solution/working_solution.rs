use std::sync::Arc;

use fxhash::FxHashSet;
use rand::{Rng, seq::IteratorRandom};
use tracing::warn;

use crate::{
    problem::{job::JobIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::solution::{activity::TourActivity, route::VehicleRoute},
};

/// Candidate solution: the routes, the jobs that could not be planned and the total cost.
///
/// `Clone` is a deep copy, a cloned solution can be mutated without affecting the original.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<VehicleRoute>,
    unassigned_jobs: FxHashSet<JobIdx>,
    cost: f64,
}

impl WorkingSolution {
    /// Solution without any route, every job unassigned.
    pub fn new(problem: Arc<VehicleRoutingProblem>) -> Self {
        let unassigned_jobs = problem.job_indices().collect();

        WorkingSolution {
            problem,
            routes: Vec::new(),
            unassigned_jobs,
            cost: 0.0,
        }
    }

    /// Solution made of the initial routes of the problem. A shipment whose pickup and delivery
    /// are not both in the same route is left unassigned. Route states are not computed.
    pub fn from_initial_routes(problem: Arc<VehicleRoutingProblem>) -> Self {
        let mut solution = WorkingSolution::new(Arc::clone(&problem));

        for initial_route in problem.initial_routes() {
            let mut route = VehicleRoute::new(&problem, initial_route.vehicle());
            let mut picked_up = FxHashSet::default();

            for &job_id in initial_route.jobs() {
                let job = problem.job(job_id);
                if job.is_shipment()
                    && initial_route
                        .jobs()
                        .iter()
                        .filter(|&&other| other == job_id)
                        .count()
                        != 2
                {
                    warn!(job = job.id(), "shipment without both stops in its initial route");
                    continue;
                }

                let activities = TourActivity::for_job(job_id, job);
                let activity = if picked_up.insert(job_id) {
                    activities[0].clone()
                } else {
                    activities[1].clone()
                };
                route.insert_activity(route.len(), activity);
                solution.unassigned_jobs.remove(&job_id);
            }

            if !route.is_empty() {
                solution.routes.push(route);
            }
        }

        solution
    }

    pub fn problem(&self) -> &Arc<VehicleRoutingProblem> {
        &self.problem
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn route(&self, route_index: usize) -> &VehicleRoute {
        &self.routes[route_index]
    }

    pub(crate) fn routes_mut(&mut self) -> &mut [VehicleRoute] {
        &mut self.routes
    }

    pub(crate) fn route_mut(&mut self, route_index: usize) -> &mut VehicleRoute {
        &mut self.routes[route_index]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &VehicleRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn unassigned_jobs(&self) -> &FxHashSet<JobIdx> {
        &self.unassigned_jobs
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned_jobs.is_empty()
    }

    pub fn is_unassigned(&self, job_id: JobIdx) -> bool {
        self.unassigned_jobs.contains(&job_id)
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub(crate) fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    pub fn route_of_job(&self, job_id: JobIdx) -> Option<usize> {
        self.routes
            .iter()
            .position(|route| route.contains_job(job_id))
    }

    pub fn assigned_jobs(&self) -> impl Iterator<Item = JobIdx> + '_ {
        self.routes.iter().flat_map(VehicleRoute::jobs)
    }

    pub fn random_assigned_job<R>(&self, rng: &mut R) -> Option<JobIdx>
    where
        R: Rng + ?Sized,
    {
        self.assigned_jobs().choose(rng)
    }

    pub(crate) fn add_route(&mut self, route: VehicleRoute) -> usize {
        self.routes.push(route);
        self.routes.len() - 1
    }

    /// Places the activities of `job_id` at the given positions of a route. `positions` are
    /// indices in the route as it is before the call, the delivery of a shipment is placed after
    /// its pickup when both share the same index.
    pub(crate) fn insert_job(&mut self, route_index: usize, job_id: JobIdx, positions: &[usize]) {
        let activities = TourActivity::for_job(job_id, self.problem.job(job_id));
        let route = &mut self.routes[route_index];

        for (offset, (activity, &position)) in activities.into_iter().zip(positions).enumerate() {
            route.insert_activity(position + offset, activity);
        }

        self.unassigned_jobs.remove(&job_id);
    }

    /// Detaches the job from its route and marks it unassigned. Returns the route it was in.
    pub fn remove_job(&mut self, job_id: JobIdx) -> Option<usize> {
        let route_index = self.route_of_job(job_id)?;
        self.routes[route_index].remove_job(job_id);
        self.unassigned_jobs.insert(job_id);
        Some(route_index)
    }

    /// Drops the routes without any job and returns the vehicles they held.
    pub(crate) fn remove_empty_routes(&mut self) -> Vec<VehicleIdx> {
        let mut vehicles = Vec::new();
        self.routes.retain(|route| {
            if route.is_empty() {
                vehicles.push(route.vehicle());
                false
            } else {
                true
            }
        });

        vehicles
    }

    pub(crate) fn mark_unassigned(&mut self, job_id: JobIdx) {
        self.unassigned_jobs.insert(job_id);
    }

    pub(crate) fn mark_assigned(&mut self, job_id: JobIdx) {
        self.unassigned_jobs.remove(&job_id);
    }

    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        if self.routes.len() != other.routes.len() || self.unassigned_jobs != other.unassigned_jobs {
            return false;
        }

        self.routes.iter().all(|route| {
            other
                .routes
                .iter()
                .any(|other_route| route.is_identical(other_route))
        })
    }
}

impl std::fmt::Debug for WorkingSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingSolution")
            .field("cost", &self.cost)
            .field("routes", &self.routes)
            .field("unassigned_jobs", &self.unassigned_jobs)
            .finish()
    }
}
