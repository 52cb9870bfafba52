use crate::{
    error::SolverError,
    problem::job::JobIdx,
    solver::solution::working_solution::WorkingSolution,
};

use super::recreate_context::RecreateContext;

pub trait RecreateSolution {
    /// Inserts as many of `jobs` as possible and returns the ones still unassigned.
    fn insert_jobs(
        &self,
        solution: &mut WorkingSolution,
        jobs: Vec<JobIdx>,
        context: &mut RecreateContext,
    ) -> Result<Vec<JobIdx>, SolverError>;
}
