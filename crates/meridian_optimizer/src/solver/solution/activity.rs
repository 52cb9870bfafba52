use std::fmt;

use smallvec::{SmallVec, smallvec};

use crate::problem::{
    capacity::Capacity,
    job::{Job, JobIdx, JobKind, JobTask},
    location::LocationIdx,
    time_window::TimeWindow,
    vehicle::VehicleBreak,
    vehicle_routing_problem::VehicleRoutingProblem,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Service(JobIdx),
    /// Pickup of a pickup job or of a shipment.
    Pickup(JobIdx),
    /// Drop of a delivery job or of a shipment.
    Delivery(JobIdx),
    Break,
}

impl ActivityKind {
    pub fn job(&self) -> Option<JobIdx> {
        match *self {
            ActivityKind::Service(job) | ActivityKind::Pickup(job) | ActivityKind::Delivery(job) => {
                Some(job)
            }
            ActivityKind::Break => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivityKind::Service(_) => "service",
            ActivityKind::Pickup(_) => "pickup",
            ActivityKind::Delivery(_) => "delivery",
            ActivityKind::Break => "break",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct TourActivity {
    kind: ActivityKind,
    location: LocationIdx,
    time_window: TimeWindow,
    duration: f64,
    arrival_time: f64,
    end_time: f64,
}

impl TourActivity {
    fn from_task(kind: ActivityKind, task: &JobTask) -> Self {
        TourActivity {
            kind,
            location: task.location(),
            time_window: *task.time_window(),
            duration: task.duration(),
            arrival_time: 0.0,
            end_time: 0.0,
        }
    }

    /// Activities realizing a job, in the order they must appear in a route.
    pub fn for_job(job_id: JobIdx, job: &Job) -> SmallVec<[TourActivity; 2]> {
        match job.kind() {
            JobKind::Service(task) => {
                smallvec![Self::from_task(ActivityKind::Service(job_id), task)]
            }
            JobKind::Pickup(task) => smallvec![Self::from_task(ActivityKind::Pickup(job_id), task)],
            JobKind::Delivery(task) => {
                smallvec![Self::from_task(ActivityKind::Delivery(job_id), task)]
            }
            JobKind::Shipment { pickup, delivery } => smallvec![
                Self::from_task(ActivityKind::Pickup(job_id), pickup),
                Self::from_task(ActivityKind::Delivery(job_id), delivery),
            ],
        }
    }

    /// A break happens where the vehicle stands, its location is resolved when the route
    /// schedule is refreshed.
    pub fn for_break(vehicle_break: &VehicleBreak, location: LocationIdx) -> Self {
        TourActivity {
            kind: ActivityKind::Break,
            location,
            time_window: *vehicle_break.time_window(),
            duration: vehicle_break.duration(),
            arrival_time: 0.0,
            end_time: 0.0,
        }
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn job(&self) -> Option<JobIdx> {
        self.kind.job()
    }

    pub fn is_break(&self) -> bool {
        self.kind == ActivityKind::Break
    }

    pub fn location(&self) -> LocationIdx {
        self.location
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn earliest_start(&self) -> f64 {
        self.time_window.start()
    }

    pub fn latest_start(&self) -> f64 {
        self.time_window.end()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn waiting_time(&self) -> f64 {
        (self.time_window.start() - self.arrival_time).max(0.0)
    }

    /// Load change when the activity is performed: positive when goods come on board.
    pub fn size(&self, problem: &VehicleRoutingProblem) -> Capacity {
        match self.kind {
            ActivityKind::Service(job) | ActivityKind::Pickup(job) => problem.job(job).demand().clone(),
            ActivityKind::Delivery(job) => -problem.job(job).demand(),
            ActivityKind::Break => Capacity::EMPTY,
        }
    }

    /// Whether the goods dropped by this activity were loaded at the depot.
    pub fn is_depot_delivery(&self, problem: &VehicleRoutingProblem) -> bool {
        match self.kind {
            ActivityKind::Delivery(job) => matches!(problem.job(job).kind(), JobKind::Delivery(_)),
            _ => false,
        }
    }

    pub(crate) fn set_location(&mut self, location: LocationIdx) {
        self.location = location;
    }

    pub(crate) fn set_schedule(&mut self, arrival_time: f64, end_time: f64) {
        self.arrival_time = arrival_time;
        self.end_time = end_time;
    }

    /// Arrival and end times when reached after leaving `departure` and travelling `travel_time`.
    pub fn schedule_after(&self, departure: f64, travel_time: f64) -> (f64, f64) {
        let arrival = departure + travel_time;
        let start = arrival.max(self.time_window.start());
        (arrival, start + self.duration)
    }
}
