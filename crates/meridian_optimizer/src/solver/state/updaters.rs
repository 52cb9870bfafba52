use crate::{
    error::StateError,
    problem::{capacity::Capacity, vehicle_routing_problem::VehicleRoutingProblem},
    solver::{
        solution::route::VehicleRoute,
        state::{RouteStates, SkillSet, StateId, StateUpdater},
    },
};

/// Forward pass recomputing arrival and end times of every activity and the arrival at the
/// route end. Breaks take the location of the stop before them.
pub fn update_schedule(problem: &VehicleRoutingProblem, route: &mut VehicleRoute) {
    let vehicle = problem.vehicle(route.vehicle());
    let mut location = vehicle.start_location();
    let mut departure = route.departure_time();

    for activity in route.activities_mut() {
        if activity.is_break() {
            activity.set_location(location);
        }

        let travel_time =
            problem.transport_time(location, activity.location(), departure, Some(vehicle));
        let (arrival, end) = activity.schedule_after(departure, travel_time);
        activity.set_schedule(arrival, end);

        location = activity.location();
        departure = end;
    }

    let end_arrival = match vehicle.end_location() {
        Some(end) => departure + problem.transport_time(location, end, departure, Some(vehicle)),
        None => departure,
    };
    route.set_end_arrival_time(end_arrival);
}

pub struct UpdateLoads;

impl StateUpdater for UpdateLoads {
    fn update(
        &self,
        problem: &VehicleRoutingProblem,
        route: &VehicleRoute,
        states: &mut RouteStates,
    ) -> Result<(), StateError> {
        let mut load_at_beginning = Capacity::EMPTY;
        for activity in route.activities() {
            if activity.is_depot_delivery(problem) {
                load_at_beginning -= &activity.size(problem);
            }
        }

        let mut load = load_at_beginning.clone();
        for (index, activity) in route.activities().iter().enumerate() {
            load += &activity.size(problem);
            states.put_activity(StateId::Load, index, load.clone())?;
        }

        states.put_route(StateId::LoadAtBeginning, load_at_beginning)?;
        states.put_route(StateId::LoadAtEnd, load)
    }
}

pub struct UpdateMaxLoads;

impl StateUpdater for UpdateMaxLoads {
    fn update(
        &self,
        _: &VehicleRoutingProblem,
        route: &VehicleRoute,
        states: &mut RouteStates,
    ) -> Result<(), StateError> {
        let mut past_max = states
            .route_state::<Capacity>(StateId::LoadAtBeginning)?
            .clone();
        for index in 0..route.len() {
            past_max.update_max(states.activity_state::<Capacity>(StateId::Load, index)?);
            states.put_activity(StateId::PastMaxLoad, index, past_max.clone())?;
        }

        let mut future_max = Capacity::EMPTY;
        for index in (0..route.len()).rev() {
            future_max.update_max(states.activity_state::<Capacity>(StateId::Load, index)?);
            states.put_activity(StateId::FutureMaxLoad, index, future_max.clone())?;
        }

        Ok(())
    }
}

/// Backward pass computing, for every activity, the latest start that keeps all the following
/// activities and the arrival at the route end within their time windows.
pub struct UpdateLatestOperationStart;

impl StateUpdater for UpdateLatestOperationStart {
    fn update(
        &self,
        problem: &VehicleRoutingProblem,
        route: &VehicleRoute,
        states: &mut RouteStates,
    ) -> Result<(), StateError> {
        let vehicle = problem.vehicle(route.vehicle());
        let mut latest_at_next = vehicle.latest_arrival();
        let mut next_location = vehicle.end_location();

        for (index, activity) in route.activities().iter().enumerate().rev() {
            let travel_time = next_location.map_or(0.0, |next| {
                problem.transport_time(activity.location(), next, activity.end_time(), Some(vehicle))
            });
            let latest = (latest_at_next - travel_time - activity.duration()).min(activity.latest_start());

            states.put_activity(StateId::LatestOperationStart, index, latest)?;
            latest_at_next = latest;
            next_location = Some(activity.location());
        }

        Ok(())
    }
}

pub struct UpdateRequiredSkills;

impl StateUpdater for UpdateRequiredSkills {
    fn update(
        &self,
        problem: &VehicleRoutingProblem,
        route: &VehicleRoute,
        states: &mut RouteStates,
    ) -> Result<(), StateError> {
        let skills: SkillSet = route
            .jobs()
            .into_iter()
            .flat_map(|job_id| problem.job(job_id).skills().iter().cloned())
            .collect();

        states.put_route(StateId::RequiredSkills, skills)
    }
}

/// Accumulated transport and activity costs, per activity and for the whole route.
pub struct UpdateCosts;

impl StateUpdater for UpdateCosts {
    fn update(
        &self,
        problem: &VehicleRoutingProblem,
        route: &VehicleRoute,
        states: &mut RouteStates,
    ) -> Result<(), StateError> {
        let vehicle = problem.vehicle(route.vehicle());
        let mut location = vehicle.start_location();
        let mut departure = route.departure_time();
        let mut total = 0.0;

        for (index, activity) in route.activities().iter().enumerate() {
            total += problem.transport_cost(location, activity.location(), departure, Some(vehicle));
            total += problem.activity_cost(activity.duration(), activity.waiting_time(), vehicle);
            states.put_activity(StateId::Costs, index, total)?;

            location = activity.location();
            departure = activity.end_time();
        }

        if !route.is_empty()
            && let Some(end) = vehicle.end_location()
        {
            total += problem.transport_cost(location, end, departure, Some(vehicle));
        }

        states.put_route(StateId::Costs, total)
    }
}
