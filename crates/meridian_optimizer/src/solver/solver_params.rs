use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{
    acceptor::schrimpf_acceptor,
    error::SolverError,
    solver::{
        recreate::recreate_strategy::RecreateStrategy,
        ruin::{ruin_share::RuinShare, ruin_strategy::RuinStrategy},
        termination::Termination,
    },
};

pub const DEFAULT_SEED: u64 = 2427121;

#[derive(Clone, Debug)]
pub struct SolverParams {
    pub terminations: Vec<Termination>,
    pub solver_acceptor: SolverAcceptorStrategy,
    pub solver_selector: SolverSelectorStrategy,

    pub max_solutions: usize,

    pub strategies: Vec<StrategyParams>,
    pub ruin_share: RuinShare,
    /// Neighbors memorized per job, all of them when `None`. Raised when a ruin can remove more
    /// jobs than that.
    pub neighborhood_size: Option<usize>,

    pub insertion_threads: Threads,
    pub vehicle_switch: bool,
    /// Rate of the waiting-time soft constraint, not registered when `None`.
    pub waiting_time_cost: Option<f64>,

    /// Threshold acceptance decay, see `SchrimpfAcceptor`.
    pub schrimpf_alpha: f64,
    /// Random-walk iterations used to calibrate the threshold when no initial threshold is set.
    pub schrimpf_warmup_iterations: usize,
    pub schrimpf_initial_threshold: Option<f64>,

    pub seed: u64,
    /// Fail the search when the final solutions do not account for every job exactly once.
    pub verify: bool,
}

/// A ruin and a recreate strategy applied in sequence, picked proportionally to `weight`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategyParams {
    pub id: String,
    pub ruin: RuinStrategy,
    pub recreate: RecreateStrategy,
    pub weight: f64,
}

impl StrategyParams {
    pub fn new(ruin: RuinStrategy, recreate: RecreateStrategy, weight: f64) -> Self {
        StrategyParams {
            id: format!("{ruin}_{recreate}"),
            ruin,
            recreate,
            weight,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverAcceptorStrategy {
    Greedy,
    Schrimpf,
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverSelectorStrategy {
    SelectBest,
    SelectRandom,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::IterationsWithoutImprovement(2000),
                Termination::Iterations(10000),
                Termination::Duration(SignedDuration::from_mins(2)),
            ],
            solver_acceptor: SolverAcceptorStrategy::Schrimpf,
            solver_selector: SolverSelectorStrategy::SelectBest,
            max_solutions: 1,
            strategies: vec![
                StrategyParams::new(RuinStrategy::Radial, RecreateStrategy::RegretInsertion, 0.5),
                StrategyParams::new(RuinStrategy::Random, RecreateStrategy::BestInsertion, 0.5),
                StrategyParams::new(RuinStrategy::Cluster, RecreateStrategy::RegretInsertion, 0.3),
            ],
            ruin_share: RuinShare::Fraction(0.3),
            neighborhood_size: Some(100),
            insertion_threads: Threads::Multi(4),
            vehicle_switch: true,
            waiting_time_cost: None,
            schrimpf_alpha: schrimpf_acceptor::DEFAULT_ALPHA,
            schrimpf_warmup_iterations: 100,
            schrimpf_initial_threshold: None,
            seed: DEFAULT_SEED,
            verify: false,
        }
    }
}

impl SolverParams {
    /// Rejects contradictory settings before anything runs.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.terminations.is_empty() {
            return Err(SolverError::MissingTermination);
        }

        if self.strategies.is_empty() {
            return Err(SolverError::NoSearchStrategy);
        }

        if self.max_solutions == 0 {
            return Err(SolverError::InvalidParameter {
                name: "max_solutions",
                reason: String::from("the population must hold at least one solution"),
            });
        }

        if !self.ruin_share.is_valid() {
            return Err(SolverError::InvalidParameter {
                name: "ruin_share",
                reason: format!("{:?} is not a valid share", self.ruin_share),
            });
        }

        if self.schrimpf_alpha <= 0.0 {
            return Err(SolverError::InvalidParameter {
                name: "schrimpf_alpha",
                reason: String::from("must be positive"),
            });
        }

        for termination in &self.terminations {
            if let Termination::VariationCoefficient { window, .. } = termination
                && *window < 2
            {
                return Err(SolverError::InvalidParameter {
                    name: "terminations",
                    reason: format!("variation coefficient window of {window} is too small"),
                });
            }
        }

        Ok(())
    }
}
