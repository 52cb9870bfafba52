use fxhash::FxHashMap;
use rand::{Rng, rngs::SmallRng, seq::SliceRandom};

use crate::{
    error::FleetError,
    problem::{
        vehicle::{VehicleIdx, VehicleTypeKey},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    utils::enumerate_idx::EnumerateIdx,
};

const SHUFFLE_PROBABILITY: f64 = 0.1;

/// Vehicles available to open or switch routes. Interchangeable vehicles share a type key and
/// only one of them is offered at a time.
pub enum FleetManager {
    Finite(FiniteFleetManager),
    Infinite(InfiniteFleetManager),
}

impl FleetManager {
    pub fn new(problem: &VehicleRoutingProblem, rng: SmallRng) -> Result<Self, FleetError> {
        if problem.vehicles().is_empty() {
            return Err(FleetError::EmptyFleet);
        }

        if problem.fleet().is_infinite() {
            Ok(FleetManager::Infinite(InfiniteFleetManager::new(problem)))
        } else {
            Ok(FleetManager::Finite(FiniteFleetManager::new(problem, rng)))
        }
    }

    pub fn lock(&mut self, problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        match self {
            FleetManager::Finite(manager) => manager.lock(problem, vehicle_id),
            FleetManager::Infinite(_) => Ok(()),
        }
    }

    pub fn unlock(&mut self, vehicle_id: VehicleIdx) {
        if let FleetManager::Finite(manager) = self {
            manager.unlock(vehicle_id);
        }
    }

    pub fn is_locked(&self, vehicle_id: VehicleIdx) -> bool {
        match self {
            FleetManager::Finite(manager) => manager.is_locked(vehicle_id),
            FleetManager::Infinite(_) => false,
        }
    }

    pub fn unlock_all(&mut self) {
        if let FleetManager::Finite(manager) = self {
            manager.unlock_all();
        }
    }

    /// One vehicle per type key with at least one vehicle available.
    pub fn available_vehicles(&self) -> Vec<VehicleIdx> {
        match self {
            FleetManager::Finite(manager) => manager.available_vehicles(None),
            FleetManager::Infinite(manager) => manager.available_vehicles(None),
        }
    }

    /// Same as `available_vehicles`, leaving out the type of `vehicle_id`.
    pub fn available_vehicles_excluding(&self, vehicle_id: VehicleIdx) -> Vec<VehicleIdx> {
        match self {
            FleetManager::Finite(manager) => manager.available_vehicles(Some(vehicle_id)),
            FleetManager::Infinite(manager) => manager.available_vehicles(Some(vehicle_id)),
        }
    }

    pub fn available_vehicle_of_type(&self, key: &VehicleTypeKey) -> Option<VehicleIdx> {
        match self {
            FleetManager::Finite(manager) => manager.available_vehicle_of_type(key),
            FleetManager::Infinite(manager) => manager.available_vehicle_of_type(key),
        }
    }
}

struct VehiclePool {
    available: Vec<VehicleIdx>,
}

pub struct FiniteFleetManager {
    pools: Vec<VehiclePool>,
    pool_of_type: FxHashMap<VehicleTypeKey, usize>,
    pool_of_vehicle: Vec<usize>,
    locked: Vec<bool>,
    rng: SmallRng,
}

impl FiniteFleetManager {
    fn new(problem: &VehicleRoutingProblem, rng: SmallRng) -> Self {
        let mut pools: Vec<VehiclePool> = Vec::new();
        let mut pool_of_type = FxHashMap::default();
        let mut pool_of_vehicle = Vec::with_capacity(problem.vehicles().len());

        for (vehicle_id, vehicle) in problem.vehicles().iter().enumerate_idx() {
            let pool = *pool_of_type.entry(vehicle.type_key()).or_insert_with(|| {
                pools.push(VehiclePool {
                    available: Vec::new(),
                });
                pools.len() - 1
            });
            pools[pool].available.push(vehicle_id);
            pool_of_vehicle.push(pool);
        }

        FiniteFleetManager {
            pools,
            pool_of_type,
            locked: vec![false; pool_of_vehicle.len()],
            pool_of_vehicle,
            rng,
        }
    }

    fn lock(&mut self, problem: &VehicleRoutingProblem, vehicle_id: VehicleIdx) -> Result<(), FleetError> {
        if self.locked[vehicle_id.get()] {
            return Err(FleetError::AlreadyLocked(
                problem.vehicle(vehicle_id).id().to_owned(),
            ));
        }

        self.locked[vehicle_id.get()] = true;
        let pool = &mut self.pools[self.pool_of_vehicle[vehicle_id.get()]];
        pool.available.retain(|&available| available != vehicle_id);

        if self.rng.random_bool(SHUFFLE_PROBABILITY) {
            pool.available.shuffle(&mut self.rng);
        }

        Ok(())
    }

    fn unlock(&mut self, vehicle_id: VehicleIdx) {
        if !self.locked[vehicle_id.get()] {
            return;
        }

        self.locked[vehicle_id.get()] = false;
        self.pools[self.pool_of_vehicle[vehicle_id.get()]]
            .available
            .push(vehicle_id);
    }

    fn is_locked(&self, vehicle_id: VehicleIdx) -> bool {
        self.locked[vehicle_id.get()]
    }

    fn unlock_all(&mut self) {
        for index in 0..self.locked.len() {
            self.unlock(VehicleIdx::new(index));
        }
    }

    fn available_vehicles(&self, excluding: Option<VehicleIdx>) -> Vec<VehicleIdx> {
        let excluded_pool = excluding.map(|vehicle_id| self.pool_of_vehicle[vehicle_id.get()]);

        self.pools
            .iter()
            .enumerate()
            .filter(|(pool, _)| Some(*pool) != excluded_pool)
            .filter_map(|(_, pool)| pool.available.first().copied())
            .collect()
    }

    fn available_vehicle_of_type(&self, key: &VehicleTypeKey) -> Option<VehicleIdx> {
        self.pool_of_type
            .get(key)
            .and_then(|&pool| self.pools[pool].available.first().copied())
    }
}

/// Every type key is represented by its first vehicle, which is never locked.
pub struct InfiniteFleetManager {
    representatives: Vec<VehicleIdx>,
    type_of_key: FxHashMap<VehicleTypeKey, usize>,
    type_of_vehicle: Vec<usize>,
}

impl InfiniteFleetManager {
    fn new(problem: &VehicleRoutingProblem) -> Self {
        let mut representatives = Vec::new();
        let mut type_of_key = FxHashMap::default();
        let mut type_of_vehicle = Vec::with_capacity(problem.vehicles().len());

        for (vehicle_id, vehicle) in problem.vehicles().iter().enumerate_idx() {
            let vehicle_type = *type_of_key.entry(vehicle.type_key()).or_insert_with(|| {
                representatives.push(vehicle_id);
                representatives.len() - 1
            });
            type_of_vehicle.push(vehicle_type);
        }

        InfiniteFleetManager {
            representatives,
            type_of_key,
            type_of_vehicle,
        }
    }

    fn available_vehicles(&self, excluding: Option<VehicleIdx>) -> Vec<VehicleIdx> {
        let excluded_type = excluding.map(|vehicle_id| self.type_of_vehicle[vehicle_id.get()]);

        self.representatives
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != excluded_type)
            .map(|(_, &vehicle_id)| vehicle_id)
            .collect()
    }

    fn available_vehicle_of_type(&self, key: &VehicleTypeKey) -> Option<VehicleIdx> {
        self.type_of_key
            .get(key)
            .map(|&vehicle_type| self.representatives[vehicle_type])
    }
}
