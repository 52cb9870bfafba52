use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;

use crate::{
    error::ProblemError,
    problem::{
        costs::{ActivityCosts, TransportCosts, ZeroActivityCosts},
        fleet::{Fleet, FleetSize},
        job::{Job, JobIdx},
        location::{Location, LocationIdx},
        travel_cost_matrix::TravelMatrices,
        vehicle::{Vehicle, VehicleIdx},
    },
    utils::enumerate_idx::EnumerateIdx,
};

pub const DEFAULT_UNASSIGNED_JOB_PENALTY: f64 = 10_000.0;

/// Route that every constructed solution starts from. A shipment appears twice in `jobs`, the
/// first occurrence is its pickup.
#[derive(Debug, Clone)]
pub struct InitialRoute {
    vehicle: VehicleIdx,
    jobs: Vec<JobIdx>,
}

impl InitialRoute {
    pub fn vehicle(&self) -> VehicleIdx {
        self.vehicle
    }

    pub fn jobs(&self) -> &[JobIdx] {
        &self.jobs
    }
}

pub struct VehicleRoutingProblem {
    locations: Vec<Location>,
    jobs: Vec<Job>,
    job_ids: FxHashMap<String, JobIdx>,
    fleet: Fleet,
    vehicle_ids: FxHashMap<String, VehicleIdx>,
    transport_costs: Arc<dyn TransportCosts>,
    activity_costs: Arc<dyn ActivityCosts>,
    initial_routes: Vec<InitialRoute>,
    unassigned_job_penalty: f64,
}

impl VehicleRoutingProblem {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[inline]
    pub fn job(&self, job_id: JobIdx) -> &Job {
        &self.jobs[job_id]
    }

    pub fn job_by_id(&self, id: &str) -> Option<JobIdx> {
        self.job_ids.get(id).copied()
    }

    pub fn job_indices(&self) -> impl Iterator<Item = JobIdx> + '_ {
        (0..self.jobs.len()).map(JobIdx::new)
    }

    pub fn random_job(&self, rng: &mut impl Rng) -> JobIdx {
        JobIdx::new(rng.random_range(0..self.jobs.len()))
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_size(&self) -> FleetSize {
        self.fleet.size()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.fleet.vehicles()
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        self.fleet.vehicle(vehicle_id)
    }

    pub fn vehicle_by_id(&self, id: &str) -> Option<VehicleIdx> {
        self.vehicle_ids.get(id).copied()
    }

    pub fn initial_routes(&self) -> &[InitialRoute] {
        &self.initial_routes
    }

    pub fn unassigned_job_penalty(&self) -> f64 {
        self.unassigned_job_penalty
    }

    #[inline]
    pub fn transport_cost(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: Option<&Vehicle>,
    ) -> f64 {
        self.transport_costs
            .transport_cost(from, to, departure_time, vehicle)
    }

    #[inline]
    pub fn transport_time(
        &self,
        from: LocationIdx,
        to: LocationIdx,
        departure_time: f64,
        vehicle: Option<&Vehicle>,
    ) -> f64 {
        self.transport_costs
            .transport_time(from, to, departure_time, vehicle)
    }

    #[inline]
    pub fn distance(&self, from: LocationIdx, to: LocationIdx) -> f64 {
        self.transport_costs.distance(from, to)
    }

    #[inline]
    pub fn activity_cost(&self, operation_duration: f64, waiting_time: f64, vehicle: &Vehicle) -> f64 {
        self.activity_costs
            .activity_cost(operation_duration, waiting_time, vehicle)
    }
}

#[derive(Default)]
pub struct VehicleRoutingProblemBuilder {
    locations: Option<Vec<Location>>,
    jobs: Option<Vec<Job>>,
    fleet: Option<Fleet>,
    transport_costs: Option<Arc<dyn TransportCosts>>,
    activity_costs: Option<Arc<dyn ActivityCosts>>,
    initial_routes: Vec<(String, Vec<String>)>,
    unassigned_job_penalty: Option<f64>,
}

impl VehicleRoutingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut VehicleRoutingProblemBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn set_jobs(&mut self, jobs: Vec<Job>) -> &mut VehicleRoutingProblemBuilder {
        self.jobs = Some(jobs);
        self
    }

    pub fn set_fleet(&mut self, fleet: Fleet) -> &mut VehicleRoutingProblemBuilder {
        self.fleet = Some(fleet);
        self
    }

    /// Defaults to euclidean travel matrices over the locations.
    pub fn set_transport_costs(
        &mut self,
        transport_costs: Arc<dyn TransportCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.transport_costs = Some(transport_costs);
        self
    }

    pub fn set_activity_costs(
        &mut self,
        activity_costs: Arc<dyn ActivityCosts>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.activity_costs = Some(activity_costs);
        self
    }

    pub fn add_initial_route(
        &mut self,
        vehicle_id: impl Into<String>,
        job_ids: Vec<String>,
    ) -> &mut VehicleRoutingProblemBuilder {
        self.initial_routes.push((vehicle_id.into(), job_ids));
        self
    }

    pub fn set_unassigned_job_penalty(&mut self, penalty: f64) -> &mut VehicleRoutingProblemBuilder {
        self.unassigned_job_penalty = Some(penalty);
        self
    }

    pub fn build(self) -> Result<VehicleRoutingProblem, ProblemError> {
        let locations = self.locations.unwrap_or_default();
        let jobs = self.jobs.unwrap_or_default();
        let fleet = self.fleet.ok_or(ProblemError::EmptyFleet)?;

        if fleet.vehicles().is_empty() {
            return Err(ProblemError::EmptyFleet);
        }

        let check_location = |owner: &str, location: LocationIdx| {
            if location.get() >= locations.len() {
                Err(ProblemError::UnknownLocation {
                    owner: owner.to_owned(),
                    location: location.get(),
                })
            } else {
                Ok(())
            }
        };

        let mut job_ids = FxHashMap::default();
        for (job_id, job) in jobs.iter().enumerate_idx() {
            if job_ids.insert(job.id().to_owned(), job_id).is_some() {
                return Err(ProblemError::DuplicateJob(job.id().to_owned()));
            }

            for location in job.locations() {
                check_location(job.id(), location)?;
            }
        }

        let mut vehicle_ids = FxHashMap::default();
        for (vehicle_id, vehicle) in fleet.vehicles().iter().enumerate_idx() {
            if vehicle_ids.insert(vehicle.id().to_owned(), vehicle_id).is_some() {
                return Err(ProblemError::DuplicateVehicle(vehicle.id().to_owned()));
            }

            check_location(vehicle.id(), vehicle.start_location())?;
            if let Some(end) = vehicle.end_location() {
                check_location(vehicle.id(), end)?;
            }
        }

        let initial_routes = Self::build_initial_routes(
            &self.initial_routes,
            &jobs,
            &job_ids,
            &vehicle_ids,
        )?;

        let transport_costs = self
            .transport_costs
            .unwrap_or_else(|| Arc::new(TravelMatrices::from_euclidean(&locations)));

        Ok(VehicleRoutingProblem {
            locations,
            jobs,
            job_ids,
            fleet,
            vehicle_ids,
            transport_costs,
            activity_costs: self
                .activity_costs
                .unwrap_or_else(|| Arc::new(ZeroActivityCosts)),
            initial_routes,
            unassigned_job_penalty: self
                .unassigned_job_penalty
                .unwrap_or(DEFAULT_UNASSIGNED_JOB_PENALTY),
        })
    }

    fn build_initial_routes(
        routes: &[(String, Vec<String>)],
        jobs: &[Job],
        job_ids: &FxHashMap<String, JobIdx>,
        vehicle_ids: &FxHashMap<String, VehicleIdx>,
    ) -> Result<Vec<InitialRoute>, ProblemError> {
        let mut used_vehicles = FxHashSet::default();
        let mut seen_jobs: FxHashMap<JobIdx, usize> = FxHashMap::default();
        let mut initial_routes = Vec::with_capacity(routes.len());

        for (vehicle_id, route_job_ids) in routes {
            let vehicle = *vehicle_ids
                .get(vehicle_id)
                .ok_or_else(|| ProblemError::UnknownVehicle(vehicle_id.clone()))?;

            if !used_vehicles.insert(vehicle) {
                return Err(ProblemError::VehicleInSeveralRoutes(vehicle_id.clone()));
            }

            let mut route_jobs = Vec::with_capacity(route_job_ids.len());
            for job_id in route_job_ids {
                let job = *job_ids
                    .get(job_id)
                    .ok_or_else(|| ProblemError::UnknownJob(job_id.clone()))?;

                let occurrences = seen_jobs.entry(job).or_default();
                *occurrences += 1;
                let allowed = if jobs[job].is_shipment() { 2 } else { 1 };
                if *occurrences > allowed {
                    return Err(ProblemError::JobInSeveralRoutes(job_id.clone()));
                }

                route_jobs.push(job);
            }

            initial_routes.push(InitialRoute {
                vehicle,
                jobs: route_jobs,
            });
        }

        Ok(initial_routes)
    }
}
