use crate::{
    problem::{
        job::{Job, JobIdx},
        vehicle::{Vehicle, VehicleIdx},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::solution::route::VehicleRoute,
};

/// Activity already placed by the insertion being evaluated, the pickup of a shipment while
/// the position of its delivery is searched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityContext {
    /// Index of the activity in the route as it was before the insertion.
    pub insertion_index: usize,
    pub arrival_time: f64,
    pub end_time: f64,
}

/// Candidate insertion of one job in one route with one vehicle. Built for every evaluation and
/// never stored.
#[derive(Clone, Copy)]
pub struct JobInsertionContext<'a> {
    pub problem: &'a VehicleRoutingProblem,
    /// Route evaluated, already bound to `new_vehicle` with refreshed states.
    pub route: &'a VehicleRoute,
    pub job_id: JobIdx,
    pub new_vehicle: VehicleIdx,
    /// Vehicle holding the route in the solution, `None` when the route would be opened.
    pub old_vehicle: Option<VehicleIdx>,
    pub new_departure_time: f64,
    pub related_activity: Option<ActivityContext>,
}

impl<'a> JobInsertionContext<'a> {
    pub fn new(
        problem: &'a VehicleRoutingProblem,
        route: &'a VehicleRoute,
        job_id: JobIdx,
        old_vehicle: Option<VehicleIdx>,
    ) -> Self {
        JobInsertionContext {
            problem,
            route,
            job_id,
            new_vehicle: route.vehicle(),
            old_vehicle,
            new_departure_time: route.departure_time(),
            related_activity: None,
        }
    }

    pub fn job(&self) -> &'a Job {
        self.problem.job(self.job_id)
    }

    pub fn vehicle(&self) -> &'a Vehicle {
        self.problem.vehicle(self.new_vehicle)
    }

    pub fn is_new_route(&self) -> bool {
        self.old_vehicle.is_none()
    }

    pub fn is_vehicle_switch(&self) -> bool {
        self.old_vehicle
            .is_some_and(|old_vehicle| old_vehicle != self.new_vehicle)
    }

    pub fn with_related_activity(self, related_activity: ActivityContext) -> Self {
        JobInsertionContext {
            related_activity: Some(related_activity),
            ..self
        }
    }
}
