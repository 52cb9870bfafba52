use std::sync::Arc;

use crate::solver::{
    constraints::{
        constraint::{
            Constraint, HardActivityConstraint, HardRouteConstraint, SoftActivityConstraint,
            SoftRouteConstraint,
        },
        constraints_status::{ConstraintsStatus, Priority},
        insertion_context::JobInsertionContext,
        load_constraint::{LoadConstraint, ServiceLoadActivityConstraint, ShipmentLoadActivityConstraint},
        skill_constraint::SkillConstraint,
        time_window_constraint::TimeWindowConstraint,
        vehicle_fixed_cost_constraint::VehicleFixedCostConstraint,
    },
    solution::{activity::TourActivity, route::Stop},
};

/// Aggregates every registered constraint. Route level hard constraints are combined with a
/// logical and, activity level ones are evaluated tier by tier.
#[derive(Default, Clone)]
pub struct ConstraintManager {
    hard_route: Vec<Arc<dyn HardRouteConstraint>>,
    critical: Vec<Arc<dyn HardActivityConstraint>>,
    high: Vec<Arc<dyn HardActivityConstraint>>,
    low: Vec<Arc<dyn HardActivityConstraint>>,
    soft_route: Vec<Arc<dyn SoftRouteConstraint>>,
    soft_activity: Vec<Arc<dyn SoftActivityConstraint>>,
}

impl ConstraintManager {
    /// Skills, capacities, time windows and vehicle fixed costs.
    pub fn with_default_constraints() -> Self {
        let mut manager = ConstraintManager::default();

        manager.add(Constraint::HardRoute(Arc::new(SkillConstraint)));
        manager.add(Constraint::HardRoute(Arc::new(LoadConstraint)));
        manager.add(Constraint::HardActivity(
            Priority::Critical,
            Arc::new(ShipmentLoadActivityConstraint),
        ));
        manager.add(Constraint::HardActivity(
            Priority::High,
            Arc::new(TimeWindowConstraint),
        ));
        manager.add(Constraint::HardActivity(
            Priority::Low,
            Arc::new(ServiceLoadActivityConstraint),
        ));
        manager.add(Constraint::SoftRoute(Arc::new(VehicleFixedCostConstraint)));

        manager
    }

    pub fn add(&mut self, constraint: Constraint) {
        match constraint {
            Constraint::HardRoute(constraint) => self.hard_route.push(constraint),
            Constraint::HardActivity(Priority::Critical, constraint) => self.critical.push(constraint),
            Constraint::HardActivity(Priority::High, constraint) => self.high.push(constraint),
            Constraint::HardActivity(Priority::Low, constraint) => self.low.push(constraint),
            Constraint::SoftRoute(constraint) => self.soft_route.push(constraint),
            Constraint::SoftActivity(constraint) => self.soft_activity.push(constraint),
        }
    }

    pub fn fulfilled(&self, context: &JobInsertionContext) -> bool {
        self.hard_route
            .iter()
            .all(|constraint| constraint.fulfilled(context))
    }

    /// A break at any tier is returned immediately, a failure is remembered while the following
    /// tiers still run.
    pub fn activity_status(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        next: Stop,
        prev_departure: f64,
    ) -> ConstraintsStatus {
        let mut status = ConstraintsStatus::Fulfilled;

        for tier in [&self.critical, &self.high, &self.low] {
            for constraint in tier {
                match constraint.fulfilled(context, prev, new_activity, next, prev_departure) {
                    ConstraintsStatus::NotFulfilledBreak => {
                        return ConstraintsStatus::NotFulfilledBreak;
                    }
                    ConstraintsStatus::NotFulfilled => status = ConstraintsStatus::NotFulfilled,
                    ConstraintsStatus::Fulfilled => {}
                }
            }
        }

        status
    }

    pub fn route_cost(&self, context: &JobInsertionContext) -> f64 {
        self.soft_route
            .iter()
            .map(|constraint| constraint.cost(context))
            .sum()
    }

    pub fn activity_cost(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        next: Stop,
        prev_departure: f64,
    ) -> f64 {
        self.soft_activity
            .iter()
            .map(|constraint| constraint.cost(context, prev, new_activity, next, prev_departure))
            .sum()
    }
}
