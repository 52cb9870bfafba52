use crate::problem::vehicle::{Vehicle, VehicleIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetSize {
    Finite,
    Infinite,
}

/// With an infinite fleet every vehicle stands for an unlimited supply of identical vehicles.
pub enum Fleet {
    Finite(Vec<Vehicle>),
    Infinite(Vec<Vehicle>),
}

impl Fleet {
    pub fn size(&self) -> FleetSize {
        match self {
            Fleet::Finite(_) => FleetSize::Finite,
            Fleet::Infinite(_) => FleetSize::Infinite,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Fleet::Infinite(_))
    }

    #[inline]
    pub fn vehicles(&self) -> &[Vehicle] {
        match self {
            Fleet::Finite(vehicles) => vehicles,
            Fleet::Infinite(vehicles) => vehicles,
        }
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &Vehicle {
        &self.vehicles()[vehicle_id]
    }
}
