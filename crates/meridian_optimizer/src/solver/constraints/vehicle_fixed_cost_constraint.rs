use crate::solver::constraints::{
    constraint::SoftRouteConstraint, insertion_context::JobInsertionContext,
};

/// Charges the fixed cost of a vehicle when a route is opened, or the difference of fixed costs
/// when a route switches vehicle.
pub struct VehicleFixedCostConstraint;

impl SoftRouteConstraint for VehicleFixedCostConstraint {
    fn cost(&self, context: &JobInsertionContext) -> f64 {
        let new_cost = context.vehicle().fixed_cost();

        match context.old_vehicle {
            None => new_cost,
            Some(old_vehicle) if old_vehicle != context.new_vehicle => {
                new_cost - context.problem.vehicle(old_vehicle).fixed_cost()
            }
            Some(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{
            fleet::Fleet,
            job::JobIdx,
            location::LocationIdx,
            vehicle::{VehicleBuilder, VehicleIdx},
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        solver::solution::route::VehicleRoute,
        test_utils,
    };

    use super::*;

    #[test]
    fn test_fixed_cost_on_open_and_switch() {
        let mut small = VehicleBuilder::new("small", LocationIdx::new(0));
        small.set_fixed_cost(50.0);
        let mut large = VehicleBuilder::new("large", LocationIdx::new(0));
        large.set_fixed_cost(80.0);

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder.set_locations(test_utils::create_location_grid(2, 2));
        builder.set_jobs(test_utils::create_basic_services(vec![1]));
        builder.set_fleet(Fleet::Finite(vec![small.build(), large.build()]));
        let problem = builder.build().unwrap();

        let route = VehicleRoute::new(&problem, VehicleIdx::new(1));
        let job_id = JobIdx::new(0);

        let opened = JobInsertionContext::new(&problem, &route, job_id, None);
        let switched = JobInsertionContext::new(&problem, &route, job_id, Some(VehicleIdx::new(0)));
        let kept = JobInsertionContext::new(&problem, &route, job_id, Some(VehicleIdx::new(1)));

        assert_eq!(VehicleFixedCostConstraint.cost(&opened), 80.0);
        assert_eq!(VehicleFixedCostConstraint.cost(&switched), 30.0);
        assert_eq!(VehicleFixedCostConstraint.cost(&kept), 0.0);
    }
}
