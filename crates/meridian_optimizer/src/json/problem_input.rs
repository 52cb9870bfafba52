use serde::{Deserialize, Serialize};

use crate::{
    error::ProblemError,
    problem::{
        capacity::Capacity,
        fleet::Fleet,
        job::{Job, JobBuilder, JobKind, JobTask},
        location::{Location, LocationIdx},
        time_window::TimeWindow,
        vehicle::{Vehicle, VehicleBreak, VehicleBuilder},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
};

/// Problem instance as read from a JSON file. Locations are cartesian coordinates and travel
/// costs are the euclidean distances between them.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct JsonVehicleRoutingProblem {
    pub locations: Vec<[f64; 2]>,
    pub jobs: Vec<JsonJob>,
    pub vehicles: Vec<JsonVehicle>,
    #[serde(default)]
    pub infinite_fleet: bool,
    #[serde(default)]
    pub initial_routes: Vec<JsonInitialRoute>,
    pub unassigned_job_penalty: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct JsonTask {
    pub location_id: usize,
    pub duration: Option<f64>,
    pub time_window: Option<TimeWindow>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonJobKind {
    Service(JsonTask),
    Pickup(JsonTask),
    Delivery(JsonTask),
    Shipment {
        pickup: JsonTask,
        delivery: JsonTask,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JsonJob {
    pub id: String,
    #[serde(flatten)]
    pub kind: JsonJobKind,
    pub demand: Option<Vec<f64>>,
    pub skills: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct JsonBreak {
    pub time_window: TimeWindow,
    pub duration: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct JsonVehicle {
    pub id: String,
    pub type_id: Option<String>,
    pub capacity: Option<Vec<f64>>,
    pub start_location_id: usize,
    pub end_location_id: Option<usize>,
    pub earliest_start: Option<f64>,
    pub latest_arrival: Option<f64>,
    pub should_return_to_depot: Option<bool>,
    pub skills: Option<Vec<String>>,
    #[serde(rename = "break")]
    pub vehicle_break: Option<JsonBreak>,
    pub fixed_cost: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct JsonInitialRoute {
    pub vehicle_id: String,
    pub job_ids: Vec<String>,
}

impl JsonTask {
    fn into_task(self) -> JobTask {
        let mut task = JobTask::new(LocationIdx::new(self.location_id));

        if let Some(duration) = self.duration {
            task = task.with_duration(duration);
        }

        if let Some(time_window) = self.time_window {
            task = task.with_time_window(time_window);
        }

        task
    }
}

impl JsonJob {
    fn into_job(self) -> Job {
        let kind = match self.kind {
            JsonJobKind::Service(task) => JobKind::Service(task.into_task()),
            JsonJobKind::Pickup(task) => JobKind::Pickup(task.into_task()),
            JsonJobKind::Delivery(task) => JobKind::Delivery(task.into_task()),
            JsonJobKind::Shipment { pickup, delivery } => JobKind::Shipment {
                pickup: pickup.into_task(),
                delivery: delivery.into_task(),
            },
        };

        let mut builder = JobBuilder::new(self.id, kind);

        if let Some(demand) = self.demand {
            builder.set_demand(Capacity::from_vec(demand));
        }

        if let Some(skills) = self.skills {
            builder.set_skills(skills);
        }

        builder.build()
    }
}

impl JsonVehicle {
    fn into_vehicle(self) -> Vehicle {
        let mut builder = VehicleBuilder::new(self.id, LocationIdx::new(self.start_location_id));

        if let Some(type_id) = self.type_id {
            builder.set_type_id(type_id);
        }

        if let Some(capacity) = self.capacity {
            builder.set_capacity(Capacity::from_vec(capacity));
        }

        if let Some(end_location_id) = self.end_location_id {
            builder.set_end_location(LocationIdx::new(end_location_id));
        }

        if self.earliest_start.is_some() || self.latest_arrival.is_some() {
            builder.set_time_window(
                self.earliest_start.unwrap_or(0.0),
                self.latest_arrival.unwrap_or(f64::MAX),
            );
        }

        if let Some(should_return) = self.should_return_to_depot {
            builder.set_return(should_return);
        }

        if let Some(skills) = self.skills {
            builder.set_skills(skills);
        }

        if let Some(vehicle_break) = self.vehicle_break {
            builder.set_break(VehicleBreak::new(
                vehicle_break.time_window,
                vehicle_break.duration,
            ));
        }

        if let Some(fixed_cost) = self.fixed_cost {
            builder.set_fixed_cost(fixed_cost);
        }

        builder.build()
    }
}

impl JsonVehicleRoutingProblem {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_problem(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let mut builder = VehicleRoutingProblemBuilder::default();

        builder.set_locations(
            self.locations
                .iter()
                .map(|&[x, y]| Location::from_cartesian(x, y))
                .collect(),
        );
        builder.set_jobs(self.jobs.into_iter().map(JsonJob::into_job).collect());

        let vehicles = self
            .vehicles
            .into_iter()
            .map(JsonVehicle::into_vehicle)
            .collect();
        builder.set_fleet(if self.infinite_fleet {
            Fleet::Infinite(vehicles)
        } else {
            Fleet::Finite(vehicles)
        });

        for route in self.initial_routes {
            builder.add_initial_route(route.vehicle_id, route.job_ids);
        }

        if let Some(penalty) = self.unassigned_job_penalty {
            builder.set_unassigned_job_penalty(penalty);
        }

        builder.build()
    }
}
