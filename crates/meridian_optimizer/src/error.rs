use thiserror::Error;

use crate::solver::state::{StateId, StateShape};

/// Errors raised while wiring or running the search. None of them are produced by a regular
/// infeasible insertion, those are reported through `ConstraintsStatus`.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("no solution available in the pool to select from")]
    EmptyPopulation,

    #[error("no search strategy registered")]
    NoSearchStrategy,

    #[error("search strategy `{0}` is already registered")]
    DuplicateStrategy(String),

    #[error("search strategy `{0}` is unknown")]
    UnknownStrategy(String),

    #[error("search strategy `{id}` has a negative weight ({weight})")]
    NegativeWeight { id: String, weight: f64 },

    #[error("at least one termination condition must be configured")]
    MissingTermination,

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("search already ran, create a new algorithm to search again")]
    AlreadyTerminated,

    #[error("solution verification failed: {0}")]
    Verification(String),

    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Solution(#[from] SolutionError),

    #[error("failed to build the insertion thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FleetError {
    #[error("vehicle `{0}` is already locked")]
    AlreadyLocked(String),

    #[error("fleet has no vehicles")]
    EmptyFleet,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProblemError {
    #[error("fleet has no vehicles")]
    EmptyFleet,

    #[error("job `{0}` is defined more than once")]
    DuplicateJob(String),

    #[error("vehicle `{0}` is defined more than once")]
    DuplicateVehicle(String),

    #[error("`{owner}` references unknown location {location}")]
    UnknownLocation { owner: String, location: usize },

    #[error("initial route references unknown job `{0}`")]
    UnknownJob(String),

    #[error("initial route references unknown vehicle `{0}`")]
    UnknownVehicle(String),

    #[error("job `{0}` appears in more than one initial route")]
    JobInSeveralRoutes(String),

    #[error("vehicle `{0}` is used by more than one initial route")]
    VehicleInSeveralRoutes(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("state {state:?} holds {expected:?} values, read as {requested:?}")]
    ShapeMismatch {
        state: StateId,
        expected: StateShape,
        requested: StateShape,
    },

    #[error("state {0:?} has not been computed")]
    Missing(StateId),

    #[error("state {0:?} was read after its route changed and before it was refreshed")]
    Stale(StateId),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolutionError {
    #[error("unknown job `{0}`")]
    UnknownJob(String),

    #[error("unknown vehicle `{0}`")]
    UnknownVehicle(String),

    #[error("job `{0}` is planned more than once")]
    DuplicateJob(String),

    #[error("vehicle `{0}` is used by more than one route")]
    DuplicateVehicle(String),

    #[error("activity `{kind}` does not match job `{job}`")]
    ActivityMismatch { job: String, kind: String },

    #[error("shipment `{0}` must be picked up before it is delivered, in the same route")]
    IncompleteShipment(String),
}
