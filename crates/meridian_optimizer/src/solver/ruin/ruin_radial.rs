use rand::Rng;

use crate::{
    problem::job::JobIdx,
    solver::{events::EventHub, solution::working_solution::WorkingSolution},
};

use super::{
    job_neighborhoods::JobNeighborhoods,
    ruin_context::{self, RuinContext},
    ruin_solution::RuinSolution,
};

/// Removes a random job and its nearest neighbors.
pub struct RuinRadial;

impl RuinRadial {
    /// Removes `target` and its `num_jobs_to_remove - 1` nearest neighbors.
    #[deprecated(note = "use `ruin_solution`, which draws the target itself")]
    pub fn ruin_around<R>(
        &self,
        solution: &mut WorkingSolution,
        target: JobIdx,
        context: RuinContext<R>,
    ) -> Vec<JobIdx>
    where
        R: Rng,
    {
        remove_around(
            solution,
            context.neighborhoods,
            context.events,
            target,
            context.num_jobs_to_remove,
        )
    }
}

impl RuinSolution for RuinRadial {
    fn ruin_solution<R>(
        &self,
        solution: &mut WorkingSolution,
        RuinContext {
            neighborhoods,
            events,
            rng,
            num_jobs_to_remove,
            ..
        }: RuinContext<R>,
    ) -> Vec<JobIdx>
    where
        R: Rng,
    {
        if num_jobs_to_remove == 0 {
            return Vec::new();
        }

        let Some(target) = solution.random_assigned_job(rng) else {
            return Vec::new();
        };

        remove_around(solution, neighborhoods, events, target, num_jobs_to_remove)
    }
}

/// Neighbors that are not planned are skipped without being replaced.
fn remove_around(
    solution: &mut WorkingSolution,
    neighborhoods: &JobNeighborhoods,
    events: &EventHub,
    target: JobIdx,
    count: usize,
) -> Vec<JobIdx> {
    if count == 0 {
        return Vec::new();
    }

    let mut removed = Vec::with_capacity(count);
    if ruin_context::remove_job(solution, events, target) {
        removed.push(target);
    }

    for neighbor in neighborhoods.nearest_neighbors(count - 1, target) {
        if ruin_context::remove_job(solution, events, neighbor) {
            removed.push(neighbor);
        }
    }

    removed
}
