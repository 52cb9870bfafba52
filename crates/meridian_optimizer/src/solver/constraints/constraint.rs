use std::sync::Arc;

use crate::solver::{
    constraints::{
        constraints_status::{ConstraintsStatus, Priority},
        insertion_context::JobInsertionContext,
    },
    solution::{activity::TourActivity, route::Stop},
};

/// Feasibility of a job in a route regardless of its position.
pub trait HardRouteConstraint: Send + Sync {
    fn fulfilled(&self, context: &JobInsertionContext) -> bool;
}

/// Feasibility of `new_activity` between `prev` and `next`, the vehicle leaving `prev` at
/// `prev_departure`.
pub trait HardActivityConstraint: Send + Sync {
    fn fulfilled(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        next: Stop,
        prev_departure: f64,
    ) -> ConstraintsStatus;
}

/// Additional cost of inserting a job in a route.
pub trait SoftRouteConstraint: Send + Sync {
    fn cost(&self, context: &JobInsertionContext) -> f64;
}

/// Additional cost of placing `new_activity` between `prev` and `next`.
pub trait SoftActivityConstraint: Send + Sync {
    fn cost(
        &self,
        context: &JobInsertionContext,
        prev: Stop,
        new_activity: &TourActivity,
        next: Stop,
        prev_departure: f64,
    ) -> f64;
}

#[derive(Clone)]
pub enum Constraint {
    HardRoute(Arc<dyn HardRouteConstraint>),
    HardActivity(Priority, Arc<dyn HardActivityConstraint>),
    SoftRoute(Arc<dyn SoftRouteConstraint>),
    SoftActivity(Arc<dyn SoftActivityConstraint>),
}

impl Constraint {
    pub fn is_hard(&self) -> bool {
        matches!(self, Constraint::HardRoute(_) | Constraint::HardActivity(..))
    }
}
