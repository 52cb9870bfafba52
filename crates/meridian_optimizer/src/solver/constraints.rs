pub mod constraint;
pub mod constraint_manager;
pub mod constraints_status;
pub mod insertion_context;
pub mod load_constraint;
pub mod skill_constraint;
pub mod time_window_constraint;
pub mod vehicle_fixed_cost_constraint;
pub mod waiting_time_constraint;

pub use constraint::{
    Constraint, HardActivityConstraint, HardRouteConstraint, SoftActivityConstraint,
    SoftRouteConstraint,
};
pub use constraint_manager::ConstraintManager;
pub use constraints_status::{ConstraintsStatus, Priority};
pub use insertion_context::{ActivityContext, JobInsertionContext};
