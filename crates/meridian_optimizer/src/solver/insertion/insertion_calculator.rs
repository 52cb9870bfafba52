use smallvec::{SmallVec, smallvec};

use crate::{
    problem::{job::JobIdx, vehicle::VehicleIdx, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        constraints::{
            ActivityContext, ConstraintManager, ConstraintsStatus, JobInsertionContext,
        },
        insertion::insertion_data::{InsertionData, InsertionTarget},
        solution::{
            activity::TourActivity,
            route::{Stop, VehicleRoute},
        },
        state::StateId,
    },
};

type Positions = SmallVec<[usize; 2]>;

/// Finds the cheapest feasible position of a job in a route. Read only, several calculators
/// can evaluate different routes at the same time.
pub struct InsertionCalculator<'a> {
    problem: &'a VehicleRoutingProblem,
    constraints: &'a ConstraintManager,
}

struct ActivityInsertion {
    cost: f64,
    arrival_time: f64,
    end_time: f64,
}

impl<'a> InsertionCalculator<'a> {
    pub fn new(problem: &'a VehicleRoutingProblem, constraints: &'a ConstraintManager) -> Self {
        InsertionCalculator {
            problem,
            constraints,
        }
    }

    /// `route` must have fresh states. Insertions not cheaper than `best_known_cost` are
    /// discarded.
    pub fn calculate(
        &self,
        route: &VehicleRoute,
        target: InsertionTarget,
        old_vehicle: Option<VehicleIdx>,
        job_id: JobIdx,
        best_known_cost: f64,
    ) -> Option<InsertionData> {
        let context = JobInsertionContext::new(self.problem, route, job_id, old_vehicle);
        if !self.constraints.fulfilled(&context) {
            return None;
        }

        let route_cost = self.constraints.route_cost(&context);
        if route_cost >= best_known_cost {
            return None;
        }

        let activities = TourActivity::for_job(job_id, self.problem.job(job_id));
        let budget = best_known_cost - route_cost;
        let (cost, positions) = match activities.as_slice() {
            [activity] => self.best_service_position(&context, activity, budget)?,
            [pickup, delivery] => self.best_shipment_positions(&context, pickup, delivery, budget)?,
            _ => return None,
        };

        Some(InsertionData {
            job_id,
            target,
            vehicle_id: route.vehicle(),
            positions,
            cost: route_cost + cost,
        })
    }

    fn best_service_position(
        &self,
        context: &JobInsertionContext,
        activity: &TourActivity,
        budget: f64,
    ) -> Option<(f64, Positions)> {
        let route = context.route;
        let mut best: Option<(f64, usize)> = None;

        for position in 0..=route.len() {
            let prev = route.prev_stop(self.problem, position);
            let next = route.next_stop(self.problem, position);
            let prev_departure = route.departure_before(position);

            match self
                .constraints
                .activity_status(context, prev, activity, next, prev_departure)
            {
                ConstraintsStatus::NotFulfilledBreak => break,
                ConstraintsStatus::NotFulfilled => continue,
                ConstraintsStatus::Fulfilled => {}
            }

            let insertion = self.activity_insertion(context, prev, activity, next, prev_departure);
            let cost = insertion.cost
                + self
                    .constraints
                    .activity_cost(context, prev, activity, next, prev_departure);

            if cost < best.map_or(budget, |(best_cost, _)| best_cost) {
                best = Some((cost, position));
            }
        }

        best.map(|(cost, position)| (cost, smallvec![position]))
    }

    fn best_shipment_positions(
        &self,
        context: &JobInsertionContext,
        pickup: &TourActivity,
        delivery: &TourActivity,
        budget: f64,
    ) -> Option<(f64, Positions)> {
        let route = context.route;
        let mut best: Option<(f64, Positions)> = None;

        for pickup_position in 0..=route.len() {
            let prev = route.prev_stop(self.problem, pickup_position);
            let next = route.next_stop(self.problem, pickup_position);
            let prev_departure = route.departure_before(pickup_position);

            match self
                .constraints
                .activity_status(context, prev, pickup, next, prev_departure)
            {
                ConstraintsStatus::NotFulfilledBreak => break,
                ConstraintsStatus::NotFulfilled => continue,
                ConstraintsStatus::Fulfilled => {}
            }

            let pickup_insertion = self.activity_insertion(context, prev, pickup, next, prev_departure);
            let pickup_cost = pickup_insertion.cost
                + self
                    .constraints
                    .activity_cost(context, prev, pickup, next, prev_departure);

            let current_best = best.as_ref().map_or(budget, |(cost, _)| *cost);
            if pickup_cost >= current_best {
                continue;
            }

            let delivery_context = context.with_related_activity(ActivityContext {
                insertion_index: pickup_position,
                arrival_time: pickup_insertion.arrival_time,
                end_time: pickup_insertion.end_time,
            });

            let mut prev = Stop::Pending { activity: pickup };
            let mut prev_departure = pickup_insertion.end_time;

            for delivery_position in pickup_position..=route.len() {
                let next = route.next_stop(self.problem, delivery_position);

                match self.constraints.activity_status(
                    &delivery_context,
                    prev,
                    delivery,
                    next,
                    prev_departure,
                ) {
                    ConstraintsStatus::NotFulfilledBreak => break,
                    ConstraintsStatus::NotFulfilled => {}
                    ConstraintsStatus::Fulfilled => {
                        let delivery_insertion = self.activity_insertion(
                            &delivery_context,
                            prev,
                            delivery,
                            next,
                            prev_departure,
                        );
                        let cost = pickup_cost
                            + delivery_insertion.cost
                            + self.constraints.activity_cost(
                                &delivery_context,
                                prev,
                                delivery,
                                next,
                                prev_departure,
                            );

                        if cost < best.as_ref().map_or(budget, |(best_cost, _)| *best_cost) {
                            best = Some((cost, smallvec![pickup_position, delivery_position]));
                        }
                    }
                }

                let Stop::Activity { index, activity } = next else {
                    break;
                };

                // the pickup delays every activity up to the delivery
                let Some(prev_location) = prev.location() else {
                    break;
                };
                let travel_time = self.problem.transport_time(
                    prev_location,
                    activity.location(),
                    prev_departure,
                    Some(context.vehicle()),
                );
                let (arrival, end) = activity.schedule_after(prev_departure, travel_time);
                let latest = route
                    .states()
                    .activity_state::<f64>(StateId::LatestOperationStart, index);
                if latest.map_or(true, |&latest| arrival > latest) {
                    break;
                }

                prev = next;
                prev_departure = end;
            }
        }

        best
    }

    /// Marginal transport and activity cost of `activity` between `prev` and `next`.
    fn activity_insertion(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        activity: &TourActivity,
        next: Stop,
        prev_departure: f64,
    ) -> ActivityInsertion {
        let problem = self.problem;
        let vehicle = context.vehicle();
        let prev_location = prev
            .location()
            .unwrap_or_else(|| context.route.start_location(problem));

        let travel_time =
            problem.transport_time(prev_location, activity.location(), prev_departure, Some(vehicle));
        let (arrival_time, end_time) = activity.schedule_after(prev_departure, travel_time);
        let waiting_time = (activity.earliest_start() - arrival_time).max(0.0);

        let mut cost = problem.transport_cost(
            prev_location,
            activity.location(),
            prev_departure,
            Some(vehicle),
        ) + problem.activity_cost(activity.duration(), waiting_time, vehicle);

        if let Some(next_location) = next.location() {
            cost += problem.transport_cost(activity.location(), next_location, end_time, Some(vehicle));

            // an empty route is not driven
            if !(prev.is_start() && next.is_end()) {
                cost -= problem.transport_cost(prev_location, next_location, prev_departure, Some(vehicle));
            }
        }

        ActivityInsertion {
            cost,
            arrival_time,
            end_time,
        }
    }
}
