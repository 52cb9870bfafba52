use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    error::SolverError,
    problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

use super::{
    best_insertion::BestInsertion, recreate_context::RecreateContext,
    recreate_solution::RecreateSolution, regret_insertion::RegretInsertion,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecreateStrategy {
    BestInsertion,
    RegretInsertion,
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestInsertion => write!(f, "BestInsertion"),
            Self::RegretInsertion => write!(f, "RegretInsertion"),
        }
    }
}

impl RecreateSolution for RecreateStrategy {
    fn insert_jobs(
        &self,
        solution: &mut WorkingSolution,
        jobs: Vec<JobIdx>,
        context: &mut RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError> {
        match self {
            RecreateStrategy::BestInsertion => BestInsertion.insert_jobs(solution, jobs, context),
            RecreateStrategy::RegretInsertion => RegretInsertion.insert_jobs(solution, jobs, context),
        }
    }
}
