use tracing::debug;

use crate::{
    error::StateError,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    solver::{
        solution::{activity::TourActivity, route::VehicleRoute, working_solution::WorkingSolution},
        state::{StateId, StateManager},
    },
};

/// Inserts the break of every route whose vehicle has one and which does not hold it yet, at
/// the cheapest position keeping the route within its time windows. Routes where no position
/// fits are left without break.
pub fn schedule_breaks(
    problem: &VehicleRoutingProblem,
    states: &StateManager,
    solution: &mut WorkingSolution,
) -> Result<(), StateError> {
    for route in solution.routes_mut() {
        if route.is_empty() || route.has_break() {
            continue;
        }

        let Some(vehicle_break) = problem.vehicle(route.vehicle()).vehicle_break() else {
            continue;
        };

        let activity = TourActivity::for_break(vehicle_break, route.start_location(problem));
        let mut best: Option<(f64, VehicleRoute)> = None;

        for position in 0..=route.len() {
            let mut candidate = route.clone();
            candidate.insert_activity(position, activity.clone());
            states.update_route(problem, &mut candidate)?;

            if !is_on_time(problem, &candidate) {
                continue;
            }

            let cost = *candidate.states().route_state::<f64>(StateId::Costs)?;
            if best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
                best = Some((cost, candidate));
            }
        }

        match best {
            Some((_, scheduled)) => *route = scheduled,
            None => debug!(
                vehicle = problem.vehicle(route.vehicle()).id(),
                "no position fits the break"
            ),
        }
    }

    Ok(())
}

fn is_on_time(problem: &VehicleRoutingProblem, route: &VehicleRoute) -> bool {
    let vehicle = problem.vehicle(route.vehicle());

    route
        .activities()
        .iter()
        .all(|activity| activity.arrival_time() <= activity.latest_start())
        && route.end_arrival_time() <= vehicle.latest_arrival()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        problem::{
            fleet::Fleet,
            location::LocationIdx,
            time_window::TimeWindow,
            vehicle::{VehicleBreak, VehicleBuilder},
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        solver::solution::activity::ActivityKind,
        test_utils::{self, TestRoute},
    };

    use super::*;

    #[test]
    fn test_break_is_placed_inside_its_window() {
        let mut vehicle = VehicleBuilder::new("v", LocationIdx::new(0));
        vehicle.set_break(VehicleBreak::new(TimeWindow::new(2.5, 3.5), 1.0));

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder.set_locations(test_utils::create_location_grid(1, 5));
        builder.set_jobs(test_utils::create_basic_services(vec![1, 2, 3, 4]));
        builder.set_fleet(Fleet::Finite(vec![vehicle.build()]));
        let problem = Arc::new(builder.build().unwrap());

        let mut solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1, 2, 3],
            }],
        );

        schedule_breaks(&problem, &StateManager::default(), &mut solution).unwrap();

        let route = &solution.routes()[0];
        let position = route
            .activities()
            .iter()
            .position(|activity| activity.kind() == ActivityKind::Break)
            .unwrap();
        let activity = route.activity(position);
        assert!(activity.arrival_time() <= 3.5);
        assert!(activity.end_time() >= 3.5);
        assert!(!route.states().is_stale());
    }
}
