use smallvec::SmallVec;

use crate::problem::{job::JobIdx, vehicle::VehicleIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionTarget {
    /// Index of a route of the solution.
    Route(usize),
    NewRoute,
}

/// Cheapest feasible insertion of a job in one route.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionData {
    pub job_id: JobIdx,
    pub target: InsertionTarget,
    /// Vehicle serving the route once the job is inserted, differs from the route vehicle on a
    /// vehicle switch.
    pub vehicle_id: VehicleIdx,
    /// Indices in the route as it is before the insertion, pickup first for shipments.
    pub positions: SmallVec<[usize; 2]>,
    pub cost: f64,
}
