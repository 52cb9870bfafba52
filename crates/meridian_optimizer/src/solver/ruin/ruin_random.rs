use rand::{Rng, seq::IndexedRandom};

use crate::{problem::job::JobIdx, solver::solution::working_solution::WorkingSolution};

use super::{
    ruin_context::{self, RuinContext},
    ruin_solution::RuinSolution,
};

/// Removes uniformly drawn jobs, without replacement.
pub struct RuinRandom;

impl RuinSolution for RuinRandom {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            events,
            rng,
            num_jobs_to_remove,
            ..
        }: RuinContext<R>,
    ) -> Vec<JobIdx>
    where
        R: Rng,
    {
        let assigned: Vec<JobIdx> = solution.assigned_jobs().collect();
        let amount = num_jobs_to_remove.min(assigned.len());

        let selected: Vec<JobIdx> = assigned.choose_multiple(rng, amount).copied().collect();
        selected
            .into_iter()
            .filter(|&job_id| ruin_context::remove_job(solution, events, job_id))
            .collect()
    }
}
