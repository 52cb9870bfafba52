use std::sync::Arc;

use rand::rngs::SmallRng;
use tracing::debug;

use crate::{
    acceptor::{
        accept_solution::{AcceptSolution, AcceptSolutionContext},
        solution_acceptor::SolutionAcceptor,
    },
    error::SolverError,
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    selector::{select_solution::SelectSolution, solution_selector::SolutionSelector},
    solver::{
        constraints::ConstraintManager,
        cost::SolutionCostCalculator,
        events::EventHub,
        fleet_manager::FleetManager,
        recreate::{
            recreate_context::RecreateContext, recreate_solution::RecreateSolution,
            recreate_strategy::RecreateStrategy,
        },
        ruin::{
            job_neighborhoods::JobNeighborhoods, ruin_context::RuinContext, ruin_share::RuinShare,
            ruin_solution::RuinSolution, ruin_strategy::RuinStrategy,
        },
        solution::{population::Population, working_solution::WorkingSolution},
        state::StateManager,
    },
};

/// Everything a strategy run reads or mutates, owned by the algorithm loop.
pub struct SearchContext<'a> {
    pub problem: &'a Arc<VehicleRoutingProblem>,
    pub constraints: &'a ConstraintManager,
    pub states: &'a StateManager,
    pub neighborhoods: &'a JobNeighborhoods,
    pub cost_calculator: &'a dyn SolutionCostCalculator,
    pub selector: &'a SolutionSelector,
    pub acceptor: &'a mut SolutionAcceptor,
    pub fleet: &'a mut FleetManager,
    pub events: &'a EventHub,
    pub rng: &'a mut SmallRng,
    pub thread_pool: &'a rayon::ThreadPool,
    pub ruin_share: RuinShare,
    pub vehicle_switch: bool,
    pub iteration: usize,
    /// Share of the search budget already spent, drives threshold decay.
    pub progress: f64,
}

/// Outcome of one strategy run. `solution` is the candidate, whether or not the population kept
/// a copy of it.
pub struct DiscoveredSolution {
    pub solution: WorkingSolution,
    pub accepted: bool,
    pub strategy_id: String,
}

/// One ruin-and-recreate move.
#[derive(Clone, Debug)]
pub struct SearchStrategy {
    id: String,
    ruin: RuinStrategy,
    recreate: RecreateStrategy,
}

impl SearchStrategy {
    pub fn new(id: impl Into<String>, ruin: RuinStrategy, recreate: RecreateStrategy) -> Self {
        SearchStrategy {
            id: id.into(),
            ruin,
            recreate,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ruin(&self) -> RuinStrategy {
        self.ruin
    }

    pub fn recreate(&self) -> RecreateStrategy {
        self.recreate
    }

    /// Selects a solution of the population, ruins and recreates a copy of it, prices it and
    /// lets the acceptor decide whether the population keeps it.
    pub fn run(
        &self,
        population: &mut Population,
        context: SearchContext,
    ) -> Result<DiscoveredSolution, SolverError> {
        let SearchContext {
            problem,
            constraints,
            states,
            neighborhoods,
            cost_calculator,
            selector,
            acceptor,
            fleet,
            events,
            rng,
            thread_pool,
            ruin_share,
            vehicle_switch,
            iteration,
            progress,
        } = context;

        let mut solution = selector
            .select_solution(population, rng)
            .ok_or(SolverError::EmptyPopulation)?
            .clone();

        fleet.unlock_all();
        for route in solution.routes() {
            fleet.lock(problem, route.vehicle())?;
        }

        let num_jobs_to_remove = ruin_share.num_jobs(problem.jobs().len(), rng);
        let removed = self.ruin.ruin_solution(
            &mut solution,
            RuinContext {
                problem,
                neighborhoods,
                events,
                rng: &mut *rng,
                num_jobs_to_remove,
            },
        );
        states.update_solution(&mut solution)?;

        let mut jobs: Vec<JobIdx> = solution.unassigned_jobs().iter().copied().collect();
        jobs.sort_unstable();

        let remaining = self.recreate.insert_jobs(
            &mut solution,
            jobs,
            &mut RecreateContext {
                problem,
                constraints,
                states,
                fleet,
                events,
                rng: &mut *rng,
                thread_pool,
                vehicle_switch,
            },
        )?;

        let cost = cost_calculator.calculate(&solution)?;
        solution.set_cost(cost);

        let accepted = acceptor.accept(
            population,
            &solution,
            AcceptSolutionContext {
                iteration,
                progress,
            },
        );

        debug!(
            iteration,
            strategy = self.id.as_str(),
            removed = removed.len(),
            unassigned = remaining.len(),
            cost,
            accepted,
            "strategy run"
        );

        Ok(DiscoveredSolution {
            solution,
            accepted,
            strategy_id: self.id.clone(),
        })
    }
}
