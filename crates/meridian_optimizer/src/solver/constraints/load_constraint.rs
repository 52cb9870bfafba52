use crate::{
    problem::{capacity::Capacity, job::JobKind},
    solver::{
        constraints::{
            constraint::{HardActivityConstraint, HardRouteConstraint},
            constraints_status::ConstraintsStatus,
            insertion_context::JobInsertionContext,
        },
        solution::{
            activity::{ActivityKind, TourActivity},
            route::{Stop, VehicleRoute},
        },
        state::StateId,
    },
};

fn load_at_beginning(route: &VehicleRoute) -> Option<Capacity> {
    route
        .states()
        .route_state::<Capacity>(StateId::LoadAtBeginning)
        .ok()
        .cloned()
}

/// Maximum load carried anywhere on the route.
fn max_load(route: &VehicleRoute) -> Option<Capacity> {
    let mut max = load_at_beginning(route)?;
    if !route.activities().is_empty() {
        max.update_max(
            route
                .states()
                .activity_state::<Capacity>(StateId::FutureMaxLoad, 0)
                .ok()?,
        );
    }

    Some(max)
}

/// Load on board right before insertion index `index`.
fn load_before(route: &VehicleRoute, index: usize) -> Option<Capacity> {
    if index == 0 {
        load_at_beginning(route)
    } else {
        route
            .states()
            .activity_state::<Capacity>(StateId::Load, index - 1)
            .ok()
            .cloned()
    }
}

/// Aggregate capacity check of a job against the whole route.
pub struct LoadConstraint;

impl HardRouteConstraint for LoadConstraint {
    fn fulfilled(&self, context: &JobInsertionContext) -> bool {
        let capacity = context.vehicle().capacity();
        let demand = context.job().demand();

        if !demand.fits_in(capacity) {
            return false;
        }

        let route = context.route;
        let Some(max) = max_load(route) else {
            return false;
        };

        if context.is_vehicle_switch() && !max.fits_in(capacity) {
            return false;
        }

        match context.job().kind() {
            JobKind::Service(_) | JobKind::Pickup(_) => (&max + demand).fits_in(capacity),
            JobKind::Delivery(_) => load_at_beginning(route)
                .is_some_and(|load| (&load + demand).fits_in(capacity)),
            JobKind::Shipment { .. } => true,
        }
    }
}

/// Capacity along the route for services, pickups and depot deliveries.
pub struct ServiceLoadActivityConstraint;

impl HardActivityConstraint for ServiceLoadActivityConstraint {
    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        _next: Stop,
        _prev_departure: f64,
    ) -> ConstraintsStatus {
        let job = context.job();
        if job.is_shipment() {
            return ConstraintsStatus::Fulfilled;
        }

        let route = context.route;
        let capacity = context.vehicle().capacity();
        let demand = job.demand();

        if new_activity.is_depot_delivery(context.problem) {
            // goods stay on board from the depot up to the new stop
            let past_max = match prev {
                Stop::Activity { index, .. } => route
                    .states()
                    .activity_state::<Capacity>(StateId::PastMaxLoad, index)
                    .ok()
                    .cloned(),
                _ => load_at_beginning(route),
            };

            return match past_max {
                Some(past_max) if (&past_max + demand).fits_in(capacity) => {
                    ConstraintsStatus::Fulfilled
                }
                _ => ConstraintsStatus::NotFulfilledBreak,
            };
        }

        let future_max = match prev {
            Stop::Activity { index, .. } => route
                .states()
                .activity_state::<Capacity>(StateId::FutureMaxLoad, index)
                .ok()
                .cloned(),
            _ => max_load(route),
        };

        match future_max {
            Some(future_max) if (&future_max + demand).fits_in(capacity) => {
                ConstraintsStatus::Fulfilled
            }
            _ => ConstraintsStatus::NotFulfilled,
        }
    }
}

/// Capacity between the pickup and the delivery of a shipment.
pub struct ShipmentLoadActivityConstraint;

impl HardActivityConstraint for ShipmentLoadActivityConstraint {
    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        _next: Stop,
        _prev_departure: f64,
    ) -> ConstraintsStatus {
        let job = context.job();
        if !job.is_shipment() {
            return ConstraintsStatus::Fulfilled;
        }

        let route = context.route;
        let capacity = context.vehicle().capacity();
        let demand = job.demand();

        let load_at_prev = match prev {
            Stop::Activity { index, .. } => load_before(route, index + 1),
            Stop::Pending { .. } => context
                .related_activity
                .and_then(|pickup| load_before(route, pickup.insertion_index)),
            _ => load_before(route, 0),
        };
        let fits = load_at_prev.is_some_and(|load| (&load + demand).fits_in(capacity));

        match new_activity.kind() {
            ActivityKind::Pickup(_) if !fits => ConstraintsStatus::NotFulfilled,
            // every later delivery position also carries the goods past `prev`
            ActivityKind::Delivery(_) if !fits => ConstraintsStatus::NotFulfilledBreak,
            _ => ConstraintsStatus::Fulfilled,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::job::{Job, JobIdx},
        solver::{solution::working_solution::WorkingSolution, state::StateManager},
        test_utils::{self, TestRoute},
    };

    use super::*;

    fn solution(jobs: Vec<Job>, route: Vec<usize>, capacity: f64) -> WorkingSolution {
        let locations = test_utils::create_location_grid(1, 6);
        let vehicles = test_utils::create_vehicles_with_capacity(vec![0], capacity);
        let problem = Arc::new(test_utils::create_test_problem(locations, jobs, vehicles));
        test_utils::create_test_working_solution(
            problem,
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: route,
            }],
        )
    }

    fn status_at<C: HardActivityConstraint>(
        constraint: &C,
        solution: &WorkingSolution,
        job: usize,
        position: usize,
    ) -> ConstraintsStatus {
        let problem = solution.problem();
        let route = &solution.routes()[0];
        let job_id = JobIdx::new(job);
        let context = JobInsertionContext::new(problem, route, job_id, Some(route.vehicle()));
        let activity = TourActivity::for_job(job_id, problem.job(job_id))[0].clone();

        constraint.fulfilled(
            &context,
            route.prev_stop(problem, position),
            &activity,
            route.next_stop(problem, position),
            route.departure_before(position),
        )
    }

    #[test]
    fn test_route_level_rejects_overflowing_service() {
        let solution = solution(
            vec![
                test_utils::create_service_with_demand("a", 1, 4.0),
                test_utils::create_service_with_demand("b", 2, 4.0),
                test_utils::create_service_with_demand("c", 3, 4.0),
            ],
            vec![0, 1],
            10.0,
        );
        let problem = solution.problem();
        let route = &solution.routes()[0];
        let context = JobInsertionContext::new(problem, route, JobIdx::new(2), Some(route.vehicle()));

        assert!(!LoadConstraint.fulfilled(&context));
    }

    #[test]
    fn test_pickup_checks_future_max_load() {
        let solution = solution(
            vec![
                test_utils::create_service_with_demand("a", 1, 6.0),
                test_utils::create_service_with_demand("b", 2, 3.0),
            ],
            vec![0],
            8.0,
        );

        // after `a` the vehicle carries 6
        assert_eq!(
            status_at(&ServiceLoadActivityConstraint, &solution, 1, 1),
            ConstraintsStatus::NotFulfilled
        );
        assert_eq!(
            status_at(&ServiceLoadActivityConstraint, &solution, 1, 0),
            ConstraintsStatus::NotFulfilled
        );
    }

    #[test]
    fn test_depot_delivery_breaks_once_past_max_is_exceeded() {
        let solution = solution(
            vec![
                test_utils::create_service_with_demand("a", 1, 6.0),
                test_utils::create_delivery("d", 2, 3.0),
            ],
            vec![0],
            8.0,
        );

        assert_eq!(
            status_at(&ServiceLoadActivityConstraint, &solution, 1, 0),
            ConstraintsStatus::Fulfilled
        );
        assert_eq!(
            status_at(&ServiceLoadActivityConstraint, &solution, 1, 1),
            ConstraintsStatus::NotFulfilledBreak
        );
    }

    #[test]
    fn test_shipment_pickup_checks_load_at_prev() {
        let solution = solution(
            vec![
                test_utils::create_service_with_demand("a", 1, 6.0),
                test_utils::create_shipment("s", 2, 3, 3.0),
            ],
            vec![0],
            8.0,
        );

        assert_eq!(
            status_at(&ShipmentLoadActivityConstraint, &solution, 1, 0),
            ConstraintsStatus::Fulfilled
        );
        assert_eq!(
            status_at(&ShipmentLoadActivityConstraint, &solution, 1, 1),
            ConstraintsStatus::NotFulfilled
        );
    }

    #[test]
    fn test_states_are_required() {
        let mut solution = solution(
            vec![test_utils::create_service_with_demand("a", 1, 1.0)],
            vec![0],
            8.0,
        );
        solution.remove_job(JobIdx::new(0));

        assert_eq!(
            status_at(&ServiceLoadActivityConstraint, &solution, 0, 0),
            ConstraintsStatus::NotFulfilled
        );

        StateManager::default().update_solution(&mut solution).unwrap();
        assert_eq!(
            status_at(&ServiceLoadActivityConstraint, &solution, 0, 0),
            ConstraintsStatus::Fulfilled
        );
    }
}
