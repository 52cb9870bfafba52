use crate::solver::{
    constraints::{constraint::SoftActivityConstraint, insertion_context::JobInsertionContext},
    solution::{activity::TourActivity, route::Stop},
};

/// Charges the time the vehicle waits for the window of the new activity to open.
pub struct WaitingTimeConstraint {
    cost_per_unit: f64,
}

impl WaitingTimeConstraint {
    pub fn new(cost_per_unit: f64) -> Self {
        WaitingTimeConstraint { cost_per_unit }
    }
}

impl SoftActivityConstraint for WaitingTimeConstraint {
    fn cost(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        _next: Stop,
        prev_departure: f64,
    ) -> f64 {
        let Some(prev_location) = prev.location() else {
            return 0.0;
        };

        let arrival = prev_departure
            + context.problem.transport_time(
                prev_location,
                new_activity.location(),
                prev_departure,
                Some(context.vehicle()),
            );

        (new_activity.earliest_start() - arrival).max(0.0) * self.cost_per_unit
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{job::JobIdx, vehicle::VehicleIdx},
        solver::solution::route::VehicleRoute,
        test_utils,
    };

    use super::*;

    #[test]
    fn test_waiting_time_is_charged() {
        let problem = Arc::new(test_utils::create_test_problem(
            test_utils::create_location_grid(1, 4),
            vec![test_utils::create_service_with_time_window("a", 3, 10.0, 20.0)],
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let route = VehicleRoute::new(&problem, VehicleIdx::new(0));
        let job_id = JobIdx::new(0);
        let context = JobInsertionContext::new(&problem, &route, job_id, None);
        let activity = TourActivity::for_job(job_id, problem.job(job_id))[0].clone();

        let cost = WaitingTimeConstraint::new(2.0).cost(
            &context,
            route.prev_stop(&problem, 0),
            &activity,
            route.next_stop(&problem, 0),
            0.0,
        );

        assert_eq!(cost, 14.0);
    }
}
