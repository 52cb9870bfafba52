use fxhash::FxHashSet;

use crate::{
    define_index_newtype,
    problem::{capacity::Capacity, location::LocationIdx, skill::Skill, time_window::TimeWindow},
};

define_index_newtype!(JobIdx, Job);

/// One stop of a job: where it happens, when it may start and how long it takes.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTask {
    location: LocationIdx,
    time_window: TimeWindow,
    duration: f64,
}

impl JobTask {
    pub fn new(location: LocationIdx) -> Self {
        JobTask {
            location,
            time_window: TimeWindow::UNBOUNDED,
            duration: 0.0,
        }
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn location(&self) -> LocationIdx {
        self.location
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    /// Picks the demand up at the stop and brings it back to the depot.
    Service(JobTask),
    Pickup(JobTask),
    /// Demand is loaded at the depot and dropped at the stop.
    Delivery(JobTask),
    Shipment {
        pickup: JobTask,
        delivery: JobTask,
    },
}

impl JobKind {
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::Service(_) => "service",
            JobKind::Pickup(_) => "pickup",
            JobKind::Delivery(_) => "delivery",
            JobKind::Shipment { .. } => "shipment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    id: String,
    kind: JobKind,
    demand: Capacity,
    skills: FxHashSet<Skill>,
}

impl Job {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &JobKind {
        &self.kind
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn is_shipment(&self) -> bool {
        matches!(self.kind, JobKind::Shipment { .. })
    }

    pub fn tasks(&self) -> impl Iterator<Item = &JobTask> {
        let (first, second) = match &self.kind {
            JobKind::Service(task) | JobKind::Pickup(task) | JobKind::Delivery(task) => {
                (task, None)
            }
            JobKind::Shipment { pickup, delivery } => (pickup, Some(delivery)),
        };

        std::iter::once(first).chain(second)
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationIdx> + '_ {
        self.tasks().map(JobTask::location)
    }
}

pub struct JobBuilder {
    id: String,
    kind: JobKind,
    demand: Option<Capacity>,
    skills: Option<Vec<Skill>>,
}

impl JobBuilder {
    pub fn new(id: impl Into<String>, kind: JobKind) -> Self {
        JobBuilder {
            id: id.into(),
            kind,
            demand: None,
            skills: None,
        }
    }

    pub fn service(id: impl Into<String>, task: JobTask) -> Self {
        Self::new(id, JobKind::Service(task))
    }

    pub fn shipment(id: impl Into<String>, pickup: JobTask, delivery: JobTask) -> Self {
        Self::new(id, JobKind::Shipment { pickup, delivery })
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut JobBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_skills(&mut self, skills: Vec<String>) -> &mut JobBuilder {
        self.skills = Some(skills.into_iter().map(Skill::new).collect());
        self
    }

    pub fn build(self) -> Job {
        Job {
            id: self.id,
            kind: self.kind,
            demand: self.demand.map(|demand| demand.abs()).unwrap_or_default(),
            skills: FxHashSet::from_iter(self.skills.unwrap_or_default()),
        }
    }
}
