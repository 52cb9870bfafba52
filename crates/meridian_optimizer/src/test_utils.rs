use std::sync::Arc;

use fxhash::FxHashSet;
use rand::RngCore;

use crate::{
    problem::{
        capacity::Capacity,
        fleet::Fleet,
        job::{Job, JobBuilder, JobIdx, JobKind, JobTask},
        location::{Location, LocationIdx},
        time_window::TimeWindow,
        vehicle::{Vehicle, VehicleBuilder, VehicleIdx},
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        solution::{activity::TourActivity, route::VehicleRoute, working_solution::WorkingSolution},
        state::StateManager,
    },
};

pub fn create_location_grid(rows: usize, cols: usize) -> Vec<Location> {
    let mut locations = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let location = Location::from_cartesian(x as f64, y as f64);
            locations.push(location);
        }
    }

    locations
}

pub fn create_locations(locations: Vec<(f64, f64)>) -> Vec<Location> {
    locations
        .iter()
        .map(|&(x, y)| Location::from_cartesian(x, y))
        .collect()
}

pub fn create_basic_services(location_ids: Vec<usize>) -> Vec<Job> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            JobBuilder::service(index.to_string(), JobTask::new(LocationIdx::new(location_id)))
                .build()
        })
        .collect()
}

pub fn create_service_with_demand(id: &str, location_id: usize, demand: f64) -> Job {
    let mut builder = JobBuilder::service(id, JobTask::new(LocationIdx::new(location_id)));
    builder.set_demand(Capacity::from_vec(vec![demand]));
    builder.build()
}

pub fn create_service_with_time_window(id: &str, location_id: usize, start: f64, end: f64) -> Job {
    let task = JobTask::new(LocationIdx::new(location_id)).with_time_window(TimeWindow::new(start, end));
    JobBuilder::service(id, task).build()
}

pub fn create_delivery(id: &str, location_id: usize, demand: f64) -> Job {
    let mut builder = JobBuilder::new(
        id,
        JobKind::Delivery(JobTask::new(LocationIdx::new(location_id))),
    );
    builder.set_demand(Capacity::from_vec(vec![demand]));
    builder.build()
}

pub fn create_shipment(id: &str, pickup_location: usize, delivery_location: usize, demand: f64) -> Job {
    let mut builder = JobBuilder::shipment(
        id,
        JobTask::new(LocationIdx::new(pickup_location)),
        JobTask::new(LocationIdx::new(delivery_location)),
    );
    builder.set_demand(Capacity::from_vec(vec![demand]));
    builder.build()
}

pub fn create_basic_vehicles(location_ids: Vec<usize>) -> Vec<Vehicle> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            VehicleBuilder::new(index.to_string(), LocationIdx::new(location_id)).build()
        })
        .collect()
}

pub fn create_vehicles_with_capacity(location_ids: Vec<usize>, capacity: f64) -> Vec<Vehicle> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| {
            let mut builder = VehicleBuilder::new(index.to_string(), LocationIdx::new(location_id));
            builder.set_capacity(Capacity::from_vec(vec![capacity]));
            builder.build()
        })
        .collect()
}

pub fn create_test_problem(
    locations: Vec<Location>,
    jobs: Vec<Job>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    let mut builder = VehicleRoutingProblemBuilder::default();

    builder.set_locations(locations);
    builder.set_jobs(jobs);
    builder.set_fleet(Fleet::Finite(vehicles));

    builder.build().unwrap()
}

pub struct TestRoute {
    pub vehicle_id: usize,
    /// Jobs in visiting order, a shipment is listed twice: pickup then delivery.
    pub service_ids: Vec<usize>,
}

pub fn create_test_working_solution(
    problem: Arc<VehicleRoutingProblem>,
    routes: Vec<TestRoute>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(Arc::clone(&problem));

    for route in routes {
        let route_index =
            solution.add_route(VehicleRoute::new(&problem, VehicleIdx::new(route.vehicle_id)));
        let mut picked_up = FxHashSet::default();

        for service_id in route.service_ids {
            let job_id = JobIdx::new(service_id);
            let activities = TourActivity::for_job(job_id, problem.job(job_id));
            let activity = if picked_up.insert(job_id) {
                activities[0].clone()
            } else {
                activities[1].clone()
            };

            let vehicle_route = solution.route_mut(route_index);
            let position = vehicle_route.len();
            vehicle_route.insert_activity(position, activity);
            solution.mark_assigned(job_id);
        }
    }

    StateManager::default()
        .update_solution(&mut solution)
        .unwrap();

    solution
}

pub struct MockRng {
    data: Vec<u64>,
    index: usize,
}

impl MockRng {
    pub fn new(data: Vec<u64>) -> Self {
        MockRng { data, index: 0 }
    }
}

impl RngCore for MockRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.data[self.index % self.data.len()];
        self.index = (self.index + 1) % self.data.len();
        value
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for byte in dst.iter_mut() {
            *byte = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_mock_rng() {
        let data = vec![1, 2, 3, 4];
        let mut rng = MockRng::new(data.clone());

        for &expected in data.iter().cycle().take(8) {
            let value = rng.next_u64();
            assert_eq!(value, expected);
        }
    }

    #[test]
    fn test_random_bool() {
        let data = vec![u64::MAX / 4; 4];
        let mut rng = MockRng::new(data);

        assert!(!rng.random_bool(0.20));
        assert!(rng.random_bool(0.26));
        assert!(rng.random_bool(0.6));
        assert!(!rng.random_bool(0.10));
    }
}
