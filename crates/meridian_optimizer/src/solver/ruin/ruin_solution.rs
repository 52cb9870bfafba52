use rand::Rng;

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::ruin_context::RuinContext;

pub trait RuinSolution {
    /// Removes jobs from the routes of `solution` and returns them, they are left unassigned.
    /// Route states are not refreshed.
    fn ruin_solution<R>(&self, solution: &mut WorkingSolution, context: RuinContext<R>) -> Vec<JobIdx>
    where
        R: Rng;
}
