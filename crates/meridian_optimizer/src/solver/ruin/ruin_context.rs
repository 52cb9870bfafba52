use rand::Rng;

use crate::{
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        events::{EventHub, RuinEvent},
        solution::working_solution::WorkingSolution,
    },
};

use super::job_neighborhoods::JobNeighborhoods;

pub struct RuinContext<'a, R>
where
    R: Rng,
{
    pub problem: &'a VehicleRoutingProblem,
    pub neighborhoods: &'a JobNeighborhoods,
    pub events: &'a EventHub,
    pub rng: &'a mut R,
    pub num_jobs_to_remove: usize,
}

/// Detaches the job from its route and notifies the ruin listeners. Returns false when the job
/// was not planned.
pub(super) fn remove_job(solution: &mut WorkingSolution, events: &EventHub, job_id: JobIdx) -> bool {
    match solution.remove_job(job_id) {
        Some(route_index) => {
            events
                .ruin
                .emit(&RuinEvent::JobRemoved { job_id, route_index });
            true
        }
        None => false,
    }
}
