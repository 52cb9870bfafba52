use crate::problem::{location::LocationIdx, vehicle::Vehicle};

/// Travel costs and times between locations. `vehicle` is `None` when the caller asks for a
/// vehicle independent value, e.g. to measure the distance between two jobs.
pub trait TransportCosts: Send + Sync {
    fn transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: Option<&Vehicle>,
    ) -> f64;

    fn transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: Option<&Vehicle>,
    ) -> f64;

    fn distance(&self, from: LocationIdx, to: LocationIdx) -> f64;
}

/// Cost of performing an activity, on top of the travel to reach it.
pub trait ActivityCosts: Send + Sync {
    fn activity_cost(&self, operation_duration: f64, waiting_time: f64, vehicle: &Vehicle) -> f64;
}

pub struct ZeroActivityCosts;

impl ActivityCosts for ZeroActivityCosts {
    fn activity_cost(&self, _: f64, _: f64, _: &Vehicle) -> f64 {
        0.0
    }
}

/// Charges operation and waiting durations with fixed rates.
pub struct DurationActivityCosts {
    pub per_operation_time: f64,
    pub per_waiting_time: f64,
}

impl ActivityCosts for DurationActivityCosts {
    fn activity_cost(&self, operation_duration: f64, waiting_time: f64, _: &Vehicle) -> f64 {
        operation_duration * self.per_operation_time + waiting_time * self.per_waiting_time
    }
}
