use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    problem::job::JobIdx,
    solver::{events::RuinEvent, solution::working_solution::WorkingSolution},
};

use super::{
    ruin_cluster::RuinCluster, ruin_context::RuinContext, ruin_radial::RuinRadial,
    ruin_random::RuinRandom, ruin_solution::RuinSolution,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuinStrategy {
    Random,
    Radial,
    Cluster,
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Radial => write!(f, "Radial"),
            Self::Cluster => write!(f, "Cluster"),
        }
    }
}

impl RuinSolution for RuinStrategy {
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let events = context.events;
        events.ruin.emit(&RuinEvent::Started {
            jobs: context.num_jobs_to_remove,
        });

        let removed = match self {
            RuinStrategy::Random => RuinRandom.ruin_solution(solution, context),
            RuinStrategy::Radial => RuinRadial.ruin_solution(solution, context),
            RuinStrategy::Cluster => RuinCluster.ruin_solution(solution, context),
        };

        events.ruin.emit(&RuinEvent::Ended {
            removed: removed.len(),
        });

        removed
    }
}
