use crate::solver::{
    constraints::{
        constraint::HardActivityConstraint, constraints_status::ConstraintsStatus,
        insertion_context::JobInsertionContext,
    },
    solution::{activity::TourActivity, route::Stop},
    state::StateId,
};

/// Time windows of the new activity, of the activities after it and latest arrival of the
/// vehicle.
pub struct TimeWindowConstraint;

impl TimeWindowConstraint {
    /// Latest start at `next` that keeps the rest of the route feasible.
    fn latest_start_at(context: &JobInsertionContext, next: Stop) -> Option<f64> {
        match next {
            Stop::Activity { index, .. } => context
                .route
                .states()
                .activity_state::<f64>(StateId::LatestOperationStart, index)
                .ok()
                .copied(),
            Stop::Pending { activity } => Some(activity.latest_start()),
            Stop::End { latest_arrival, .. } => Some(latest_arrival),
            Stop::Start { .. } => None,
        }
    }
}

impl HardActivityConstraint for TimeWindowConstraint {
    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        next: Stop,
        prev_departure: f64,
    ) -> ConstraintsStatus {
        let problem = context.problem;
        let vehicle = context.vehicle();
        let latest_vehicle_arrival = vehicle.latest_arrival();

        if latest_vehicle_arrival < prev_departure {
            return ConstraintsStatus::NotFulfilledBreak;
        }

        // later positions only start later
        if new_activity.latest_start() < prev.earliest_start() {
            return ConstraintsStatus::NotFulfilledBreak;
        }

        let Some(prev_location) = prev.location() else {
            return ConstraintsStatus::NotFulfilled;
        };

        let Some(next_location) = next.location() else {
            // open route, nothing is visited after the new activity
            let travel_time = problem.transport_time(
                prev_location,
                new_activity.location(),
                prev_departure,
                Some(vehicle),
            );
            let (arrival, end) = new_activity.schedule_after(prev_departure, travel_time);
            return if arrival > new_activity.latest_start() || end > latest_vehicle_arrival {
                ConstraintsStatus::NotFulfilled
            } else {
                ConstraintsStatus::Fulfilled
            };
        };

        let Some(latest_at_next) = Self::latest_start_at(context, next) else {
            return ConstraintsStatus::NotFulfilled;
        };

        let direct_arrival = prev_departure
            + problem.transport_time(prev_location, next_location, prev_departure, Some(vehicle));
        if direct_arrival > latest_at_next {
            return ConstraintsStatus::NotFulfilledBreak;
        }

        let travel_time = problem.transport_time(
            prev_location,
            new_activity.location(),
            prev_departure,
            Some(vehicle),
        );
        let (arrival, end) = new_activity.schedule_after(prev_departure, travel_time);
        if arrival > new_activity.latest_start() {
            return ConstraintsStatus::NotFulfilled;
        }

        let arrival_at_next =
            end + problem.transport_time(new_activity.location(), next_location, end, Some(vehicle));
        if arrival_at_next > latest_at_next {
            return ConstraintsStatus::NotFulfilled;
        }

        ConstraintsStatus::Fulfilled
    }
}
