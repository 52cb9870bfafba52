mod route_states;
mod state_manager;
pub mod updaters;

use fxhash::FxHashSet;

use crate::problem::{capacity::Capacity, skill::Skill};

pub use route_states::RouteStates;
pub use state_manager::{StateManager, StateUpdater};

pub type SkillSet = FxHashSet<Skill>;

/// Key of a cached route or activity state. Every key declares the shape of the values stored
/// under it, typed reads and writes are checked against that shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    /// Load after the activity.
    Load,
    LoadAtBeginning,
    LoadAtEnd,
    /// Maximum load from the route start up to and including the activity.
    PastMaxLoad,
    /// Maximum load from the activity up to the route end.
    FutureMaxLoad,
    LatestOperationStart,
    RequiredSkills,
    /// Accumulated cost up to the activity, or of the whole route.
    Costs,
    Custom { name: &'static str, shape: StateShape },
}

impl StateId {
    pub fn shape(&self) -> StateShape {
        match self {
            StateId::Load
            | StateId::LoadAtBeginning
            | StateId::LoadAtEnd
            | StateId::PastMaxLoad
            | StateId::FutureMaxLoad => StateShape::Capacity,
            StateId::LatestOperationStart | StateId::Costs => StateShape::Scalar,
            StateId::RequiredSkills => StateShape::Skills,
            StateId::Custom { shape, .. } => *shape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateShape {
    Scalar,
    Capacity,
    Skills,
}

#[derive(Debug, Clone)]
pub enum StateValue {
    Scalar(f64),
    Capacity(Capacity),
    Skills(SkillSet),
}

impl StateValue {
    pub fn shape(&self) -> StateShape {
        match self {
            StateValue::Scalar(_) => StateShape::Scalar,
            StateValue::Capacity(_) => StateShape::Capacity,
            StateValue::Skills(_) => StateShape::Skills,
        }
    }
}

/// Rust type stored under a given `StateShape`.
pub trait StateValueType: Sized {
    const SHAPE: StateShape;

    fn from_value(value: &StateValue) -> Option<&Self>;

    fn into_value(self) -> StateValue;
}

impl StateValueType for f64 {
    const SHAPE: StateShape = StateShape::Scalar;

    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Scalar(self)
    }
}

impl StateValueType for Capacity {
    const SHAPE: StateShape = StateShape::Capacity;

    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Capacity(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Capacity(self)
    }
}

impl StateValueType for SkillSet {
    const SHAPE: StateShape = StateShape::Skills;

    fn from_value(value: &StateValue) -> Option<&Self> {
        match value {
            StateValue::Skills(value) => Some(value),
            _ => None,
        }
    }

    fn into_value(self) -> StateValue {
        StateValue::Skills(self)
    }
}
