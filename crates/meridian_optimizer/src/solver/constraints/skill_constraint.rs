use crate::solver::constraints::{
    constraint::HardRouteConstraint, insertion_context::JobInsertionContext,
};

/// The vehicle must carry every skill required by the job. Skills of the jobs already in the
/// route were checked when they were inserted, a vehicle switch checks them again.
pub struct SkillConstraint;

impl HardRouteConstraint for SkillConstraint {
    fn fulfilled(&self, context: &JobInsertionContext) -> bool {
        let vehicle = context.vehicle();
        if !vehicle.is_compatible_with(context.job()) {
            return false;
        }

        if !context.is_vehicle_switch() {
            return true;
        }

        context
            .route
            .jobs()
            .into_iter()
            .all(|job_id| vehicle.is_compatible_with(context.problem.job(job_id)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{
            fleet::Fleet,
            job::{JobBuilder, JobIdx, JobTask},
            location::LocationIdx,
            vehicle::{VehicleBuilder, VehicleIdx},
            vehicle_routing_problem::VehicleRoutingProblemBuilder,
        },
        solver::solution::route::VehicleRoute,
        test_utils,
    };

    use super::*;

    #[test]
    fn test_job_skills_must_be_covered() {
        let mut job = JobBuilder::service("a", JobTask::new(LocationIdx::new(1)));
        job.set_skills(vec!["fridge".to_owned()]);

        let plain = VehicleBuilder::new("plain", LocationIdx::new(0)).build();
        let mut equipped = VehicleBuilder::new("equipped", LocationIdx::new(0));
        equipped.set_skills(vec!["fridge".to_owned(), "lift".to_owned()]);

        let mut builder = VehicleRoutingProblemBuilder::default();
        builder.set_locations(test_utils::create_location_grid(2, 2));
        builder.set_jobs(vec![job.build()]);
        builder.set_fleet(Fleet::Finite(vec![plain, equipped.build()]));
        let problem = builder.build().unwrap();

        let plain_route = VehicleRoute::new(&problem, VehicleIdx::new(0));
        let equipped_route = VehicleRoute::new(&problem, VehicleIdx::new(1));
        let job_id = JobIdx::new(0);

        assert!(!SkillConstraint.fulfilled(&JobInsertionContext::new(
            &problem,
            &plain_route,
            job_id,
            None
        )));
        assert!(SkillConstraint.fulfilled(&JobInsertionContext::new(
            &problem,
            &equipped_route,
            job_id,
            None
        )));
    }
}
