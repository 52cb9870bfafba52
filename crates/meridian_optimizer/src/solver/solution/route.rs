use fxhash::FxHashSet;

use crate::{
    problem::{
        job::JobIdx, location::LocationIdx, vehicle::VehicleIdx,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{solution::activity::TourActivity, state::RouteStates},
};

/// Neighbor of a candidate insertion: the synthetic route start, an existing activity, an activity
/// evaluated in the same insertion but not yet in the route, or the synthetic route end.
#[derive(Debug, Clone, Copy)]
pub enum Stop<'a> {
    Start {
        location: LocationIdx,
        departure: f64,
    },
    Activity {
        index: usize,
        activity: &'a TourActivity,
    },
    /// Pickup of a shipment while its delivery position is searched.
    Pending {
        activity: &'a TourActivity,
    },
    /// `location` is `None` when the route is open and ends at its last activity.
    End {
        location: Option<LocationIdx>,
        latest_arrival: f64,
    },
}

impl Stop<'_> {
    pub fn location(&self) -> Option<LocationIdx> {
        match self {
            Stop::Start { location, .. } => Some(*location),
            Stop::Activity { activity, .. } | Stop::Pending { activity } => {
                Some(activity.location())
            }
            Stop::End { location, .. } => *location,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Stop::Start { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Stop::End { .. })
    }

    pub fn earliest_start(&self) -> f64 {
        match self {
            Stop::Start { departure, .. } => *departure,
            Stop::Activity { activity, .. } | Stop::Pending { activity } => {
                activity.earliest_start()
            }
            Stop::End { .. } => 0.0,
        }
    }

    pub fn activity_index(&self) -> Option<usize> {
        match self {
            Stop::Activity { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VehicleRoute {
    vehicle: VehicleIdx,
    departure_time: f64,
    activities: Vec<TourActivity>,
    end_arrival_time: f64,
    states: RouteStates,
}

impl VehicleRoute {
    pub fn new(problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Self {
        let departure_time = problem.vehicle(vehicle_id).earliest_start();
        VehicleRoute {
            vehicle: vehicle_id,
            departure_time,
            activities: Vec::new(),
            end_arrival_time: departure_time,
            states: RouteStates::default(),
        }
    }

    pub fn vehicle(&self) -> VehicleIdx {
        self.vehicle
    }

    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    pub fn end_arrival_time(&self) -> f64 {
        self.end_arrival_time
    }

    pub fn activities(&self) -> &[TourActivity] {
        &self.activities
    }

    pub fn activity(&self, index: usize) -> &TourActivity {
        &self.activities[index]
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// A route holding nothing but a break counts as empty.
    pub fn is_empty(&self) -> bool {
        self.activities.iter().all(TourActivity::is_break)
    }

    pub fn has_break(&self) -> bool {
        self.activities.iter().any(TourActivity::is_break)
    }

    pub fn contains_job(&self, job_id: JobIdx) -> bool {
        self.activities
            .iter()
            .any(|activity| activity.job() == Some(job_id))
    }

    /// Distinct jobs served by the route, in order of first appearance.
    pub fn jobs(&self) -> Vec<JobIdx> {
        let mut seen = FxHashSet::default();
        self.activities
            .iter()
            .filter_map(TourActivity::job)
            .filter(|job_id| seen.insert(*job_id))
            .collect()
    }

    pub fn start_location(&self, problem: &VehicleRoutingProblem) -> LocationIdx {
        problem.vehicle(self.vehicle).start_location()
    }

    /// Vehicle end location, or the last visited location for open routes.
    pub fn end_location(&self, problem: &VehicleRoutingProblem) -> LocationIdx {
        problem
            .vehicle(self.vehicle)
            .end_location()
            .or_else(|| self.activities.last().map(TourActivity::location))
            .unwrap_or_else(|| self.start_location(problem))
    }

    /// Stop preceding insertion index `index`.
    pub fn prev_stop(&self, problem: &VehicleRoutingProblem, index: usize) -> Stop<'_> {
        if index == 0 {
            Stop::Start {
                location: self.start_location(problem),
                departure: self.departure_time,
            }
        } else {
            Stop::Activity {
                index: index - 1,
                activity: &self.activities[index - 1],
            }
        }
    }

    /// Stop following insertion index `index`.
    pub fn next_stop(&self, problem: &VehicleRoutingProblem, index: usize) -> Stop<'_> {
        if index >= self.activities.len() {
            let vehicle = problem.vehicle(self.vehicle);
            Stop::End {
                location: vehicle.end_location(),
                latest_arrival: vehicle.latest_arrival(),
            }
        } else {
            Stop::Activity {
                index,
                activity: &self.activities[index],
            }
        }
    }

    /// Departure time from the stop preceding insertion index `index`.
    pub fn departure_before(&self, index: usize) -> f64 {
        if index == 0 {
            self.departure_time
        } else {
            self.activities[index - 1].end_time()
        }
    }

    pub fn states(&self) -> &RouteStates {
        &self.states
    }

    pub(crate) fn insert_activity(&mut self, index: usize, activity: TourActivity) {
        self.activities.insert(index, activity);
        self.states.mark_stale();
    }

    /// Removes every activity of the job. Returns whether the job was in the route.
    pub(crate) fn remove_job(&mut self, job_id: JobIdx) -> bool {
        let len = self.activities.len();
        self.activities.retain(|activity| activity.job() != Some(job_id));
        let removed = self.activities.len() != len;

        if removed {
            if self.is_empty() {
                self.activities.clear();
            }
            self.states.mark_stale();
        }

        removed
    }

    pub(crate) fn set_vehicle(&mut self, problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) {
        self.vehicle = vehicle_id;
        self.departure_time = problem.vehicle(vehicle_id).earliest_start();
        self.states.mark_stale();
    }

    pub(crate) fn set_departure_time(&mut self, departure_time: f64) {
        self.departure_time = departure_time;
        self.states.mark_stale();
    }

    pub(crate) fn activities_mut(&mut self) -> &mut [TourActivity] {
        &mut self.activities
    }

    pub(crate) fn set_end_arrival_time(&mut self, end_arrival_time: f64) {
        self.end_arrival_time = end_arrival_time;
    }

    pub(crate) fn replace_states(&mut self, states: RouteStates) {
        self.states = states;
    }

    pub fn is_identical(&self, other: &VehicleRoute) -> bool {
        self.vehicle == other.vehicle
            && self.activities.len() == other.activities.len()
            && self
                .activities
                .iter()
                .zip(other.activities.iter())
                .all(|(a, b)| a.kind() == b.kind())
    }
}
