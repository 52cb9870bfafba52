use fxhash::FxHashSet;

use crate::{
    define_index_newtype,
    problem::{capacity::Capacity, job::Job, location::LocationIdx, skill::Skill, time_window::TimeWindow},
};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleBreak {
    time_window: TimeWindow,
    duration: f64,
}

impl VehicleBreak {
    pub fn new(time_window: TimeWindow, duration: f64) -> Self {
        VehicleBreak {
            time_window,
            duration,
        }
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    id: String,
    type_id: String,
    capacity: Capacity,
    start_location: LocationIdx,
    end_location: Option<LocationIdx>,
    earliest_start: f64,
    latest_arrival: f64,
    skills: FxHashSet<Skill>,
    return_to_depot: bool,
    vehicle_break: Option<VehicleBreak>,
    fixed_cost: f64,
}

/// Equivalence key of interchangeable vehicles. Two vehicles with the same key can replace each
/// other in a route without changing its feasibility or cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleTypeKey {
    type_id: String,
    start_location: LocationIdx,
    end_location: Option<LocationIdx>,
    earliest_start: u64,
    latest_arrival: u64,
    skills: Vec<Skill>,
    return_to_depot: bool,
    vehicle_break: Option<(u64, u64, u64)>,
}

impl VehicleTypeKey {
    pub fn type_id(&self) -> &str {
        &self.type_id
    }
}

impl Vehicle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn start_location(&self) -> LocationIdx {
        self.start_location
    }

    /// Location the route ends at, `None` for open routes.
    pub fn end_location(&self) -> Option<LocationIdx> {
        if self.return_to_depot {
            Some(self.end_location.unwrap_or(self.start_location))
        } else {
            None
        }
    }

    pub fn earliest_start(&self) -> f64 {
        self.earliest_start
    }

    pub fn latest_arrival(&self) -> f64 {
        self.latest_arrival
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn should_return_to_depot(&self) -> bool {
        self.return_to_depot
    }

    pub fn vehicle_break(&self) -> Option<&VehicleBreak> {
        self.vehicle_break.as_ref()
    }

    pub fn fixed_cost(&self) -> f64 {
        self.fixed_cost
    }

    pub fn is_compatible_with(&self, job: &Job) -> bool {
        job.skills().is_subset(&self.skills)
    }

    pub fn type_key(&self) -> VehicleTypeKey {
        let mut skills: Vec<Skill> = self.skills.iter().cloned().collect();
        skills.sort_unstable();

        VehicleTypeKey {
            type_id: self.type_id.clone(),
            start_location: self.start_location,
            end_location: self.end_location(),
            earliest_start: self.earliest_start.to_bits(),
            latest_arrival: self.latest_arrival.to_bits(),
            skills,
            return_to_depot: self.return_to_depot,
            vehicle_break: self.vehicle_break.as_ref().map(|vehicle_break| {
                (
                    vehicle_break.time_window.start().to_bits(),
                    vehicle_break.time_window.end().to_bits(),
                    vehicle_break.duration.to_bits(),
                )
            }),
        }
    }
}

pub struct VehicleBuilder {
    id: String,
    start_location: LocationIdx,
    type_id: Option<String>,
    capacity: Option<Capacity>,
    end_location: Option<LocationIdx>,
    earliest_start: Option<f64>,
    latest_arrival: Option<f64>,
    skills: Option<Vec<Skill>>,
    return_to_depot: Option<bool>,
    vehicle_break: Option<VehicleBreak>,
    fixed_cost: Option<f64>,
}

impl VehicleBuilder {
    pub fn new(id: impl Into<String>, start_location: LocationIdx) -> Self {
        VehicleBuilder {
            id: id.into(),
            start_location,
            type_id: None,
            capacity: None,
            end_location: None,
            earliest_start: None,
            latest_arrival: None,
            skills: None,
            return_to_depot: None,
            vehicle_break: None,
            fixed_cost: None,
        }
    }

    pub fn set_type_id(&mut self, type_id: impl Into<String>) -> &mut VehicleBuilder {
        self.type_id = Some(type_id.into());
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut VehicleBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_end_location(&mut self, end_location: LocationIdx) -> &mut VehicleBuilder {
        self.end_location = Some(end_location);
        self
    }

    pub fn set_time_window(&mut self, earliest_start: f64, latest_arrival: f64) -> &mut VehicleBuilder {
        self.earliest_start = Some(earliest_start);
        self.latest_arrival = Some(latest_arrival);
        self
    }

    pub fn set_skills(&mut self, skills: Vec<String>) -> &mut VehicleBuilder {
        self.skills = Some(skills.into_iter().map(Skill::new).collect());
        self
    }

    pub fn set_return(&mut self, return_to_depot: bool) -> &mut VehicleBuilder {
        self.return_to_depot = Some(return_to_depot);
        self
    }

    pub fn set_break(&mut self, vehicle_break: VehicleBreak) -> &mut VehicleBuilder {
        self.vehicle_break = Some(vehicle_break);
        self
    }

    pub fn set_fixed_cost(&mut self, fixed_cost: f64) -> &mut VehicleBuilder {
        self.fixed_cost = Some(fixed_cost);
        self
    }

    pub fn build(self) -> Vehicle {
        Vehicle {
            type_id: self.type_id.unwrap_or_else(|| String::from("default")),
            id: self.id,
            capacity: self.capacity.unwrap_or(Capacity::EMPTY),
            start_location: self.start_location,
            end_location: self.end_location,
            earliest_start: self.earliest_start.unwrap_or(0.0),
            latest_arrival: self.latest_arrival.unwrap_or(f64::MAX),
            skills: FxHashSet::from_iter(self.skills.unwrap_or_default()),
            return_to_depot: self.return_to_depot.unwrap_or(true),
            vehicle_break: self.vehicle_break,
            fixed_cost: self.fixed_cost.unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::job::{JobBuilder, JobTask};

    use super::*;

    #[test]
    fn test_type_key_ignores_vehicle_id() {
        let mut first = VehicleBuilder::new("v1", LocationIdx::new(0));
        first.set_skills(vec!["b".into(), "a".into()]);
        let mut second = VehicleBuilder::new("v2", LocationIdx::new(0));
        second.set_skills(vec!["a".into(), "b".into()]);

        assert_eq!(first.build().type_key(), second.build().type_key());
    }

    #[test]
    fn test_type_key_differs_on_break() {
        let first = VehicleBuilder::new("v1", LocationIdx::new(0)).build();
        let mut second = VehicleBuilder::new("v2", LocationIdx::new(0));
        second.set_break(VehicleBreak::new(TimeWindow::new(10.0, 20.0), 5.0));

        assert_ne!(first.type_key(), second.build().type_key());
    }

    #[test]
    fn test_open_route_has_no_end() {
        let mut builder = VehicleBuilder::new("v1", LocationIdx::new(2));
        builder.set_return(false);
        assert_eq!(builder.build().end_location(), None);

        let vehicle = VehicleBuilder::new("v2", LocationIdx::new(2)).build();
        assert_eq!(vehicle.end_location(), Some(LocationIdx::new(2)));
    }

    #[test]
    fn test_skill_compatibility() {
        let mut builder = VehicleBuilder::new("v1", LocationIdx::new(0));
        builder.set_skills(vec!["fridge".into()]);
        let vehicle = builder.build();

        let mut job = JobBuilder::service("j1", JobTask::new(LocationIdx::new(1)));
        job.set_skills(vec!["fridge".into()]);
        assert!(vehicle.is_compatible_with(&job.build()));

        let mut job = JobBuilder::service("j2", JobTask::new(LocationIdx::new(1)));
        job.set_skills(vec!["crane".into()]);
        assert!(!vehicle.is_compatible_with(&job.build()));
    }
}
