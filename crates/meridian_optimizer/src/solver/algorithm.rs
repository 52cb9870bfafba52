use std::sync::Arc;

use parking_lot::Mutex;
use rand::{SeedableRng, rngs::SmallRng};
use tracing::{debug, info, warn};

use crate::{
    acceptor::{
        greedy_solution_acceptor::GreedySolutionAcceptor, schrimpf_acceptor::SchrimpfAcceptor,
        solution_acceptor::SolutionAcceptor,
    },
    error::SolverError,
    problem::{job::JobIdx, vehicle_routing_problem::VehicleRoutingProblem},
    selector::{
        select_best_selector::SelectBestSelector, select_random_selector::SelectRandomSelector,
        solution_selector::SolutionSelector,
    },
    solver::{
        constraints::{Constraint, ConstraintManager, waiting_time_constraint::WaitingTimeConstraint},
        cost::{DefaultSolutionCost, SolutionCostCalculator},
        events::{AlgorithmEvent, EventHub},
        fleet_manager::FleetManager,
        recreate::{recreate_context::RecreateContext, recreate_solution::RecreateSolution},
        ruin::job_neighborhoods::{AverageJobDistance, JobNeighborhoods},
        search_strategy::{SearchContext, SearchStrategy},
        search_strategy_manager::SearchStrategyManager,
        solution::{population::Population, working_solution::WorkingSolution},
        solver_params::{SolverAcceptorStrategy, SolverParams, SolverSelectorStrategy},
        state::StateManager,
        termination::{SearchProgress, Termination},
        verifier,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlgorithmState {
    NotStarted,
    Running,
    Terminated,
}

pub struct AlgorithmResult {
    /// Final population followed by the best solution found.
    pub solutions: Vec<WorkingSolution>,
    pub iterations: usize,
    pub accepted: usize,
    /// Best cost after construction and after every improvement.
    pub best_cost_history: Vec<f64>,
}

impl AlgorithmResult {
    pub fn best_solution(&self) -> Option<&WorkingSolution> {
        self.solutions.last()
    }
}

/// Ruin-and-recreate search. An algorithm runs once, build a new one to search again.
pub struct Algorithm {
    problem: Arc<VehicleRoutingProblem>,
    params: SolverParams,
    constraints: ConstraintManager,
    states: StateManager,
    cost_calculator: Arc<dyn SolutionCostCalculator>,
    strategies: SearchStrategyManager,
    neighborhoods: Arc<JobNeighborhoods>,
    events: EventHub,
    initial_solutions: Vec<WorkingSolution>,
    thread_pool: rayon::ThreadPool,
    state: AlgorithmState,
}

impl Algorithm {
    pub fn new(problem: Arc<VehicleRoutingProblem>, params: SolverParams) -> Result<Self, SolverError> {
        params.validate()?;

        // a radial ruin asks for one neighbor less than the jobs it removes
        let largest_ruin = params.ruin_share.max_jobs(problem.jobs().len());
        let neighborhood_size = params
            .neighborhood_size
            .map(|size| size.max(largest_ruin.saturating_sub(1)));
        let neighborhoods = Arc::new(JobNeighborhoods::new(
            &problem,
            &AverageJobDistance,
            neighborhood_size,
        ));

        Self::with_neighborhoods(problem, params, neighborhoods)
    }

    fn with_neighborhoods(
        problem: Arc<VehicleRoutingProblem>,
        params: SolverParams,
        neighborhoods: Arc<JobNeighborhoods>,
    ) -> Result<Self, SolverError> {
        params.validate()?;

        let mut constraints = ConstraintManager::with_default_constraints();
        if let Some(cost_per_unit) = params.waiting_time_cost {
            constraints.add(Constraint::SoftActivity(Arc::new(WaitingTimeConstraint::new(
                cost_per_unit,
            ))));
        }

        let mut strategies = SearchStrategyManager::default();
        for strategy in &params.strategies {
            strategies.add(
                SearchStrategy::new(strategy.id.clone(), strategy.ruin, strategy.recreate),
                strategy.weight,
            )?;
        }

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.insertion_threads.number_of_threads())
            .build()?;

        Ok(Algorithm {
            problem,
            params,
            constraints,
            states: StateManager::default(),
            cost_calculator: Arc::new(DefaultSolutionCost),
            strategies,
            neighborhoods,
            events: EventHub::default(),
            initial_solutions: Vec::new(),
            thread_pool,
            state: AlgorithmState::NotStarted,
        })
    }

    pub fn problem(&self) -> &Arc<VehicleRoutingProblem> {
        &self.problem
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    /// Seeds the population instead of constructing a first solution.
    pub fn add_initial_solution(&mut self, solution: WorkingSolution) {
        self.initial_solutions.push(solution);
    }

    pub fn events_mut(&mut self) -> &mut EventHub {
        &mut self.events
    }

    pub fn constraints_mut(&mut self) -> &mut ConstraintManager {
        &mut self.constraints
    }

    pub fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    pub fn strategies_mut(&mut self) -> &mut SearchStrategyManager {
        &mut self.strategies
    }

    pub fn set_cost_calculator(&mut self, cost_calculator: Arc<dyn SolutionCostCalculator>) {
        self.cost_calculator = cost_calculator;
    }

    pub fn search(&mut self) -> Result<AlgorithmResult, SolverError> {
        if self.state != AlgorithmState::NotStarted {
            return Err(SolverError::AlreadyTerminated);
        }

        self.state = AlgorithmState::Running;
        let result = self.run();
        self.state = AlgorithmState::Terminated;

        result
    }

    fn run(&mut self) -> Result<AlgorithmResult, SolverError> {
        if self.strategies.is_empty() {
            return Err(SolverError::NoSearchStrategy);
        }

        let mut rng = SmallRng::seed_from_u64(self.params.seed);
        let mut fleet = FleetManager::new(&self.problem, SmallRng::from_rng(&mut rng))?;
        let mut population = Population::new(self.params.max_solutions);

        self.seed_population(&mut population, &mut fleet, &mut rng)?;
        let mut best = population
            .best()
            .cloned()
            .ok_or(SolverError::EmptyPopulation)?;

        let mut acceptor = self.create_solution_acceptor(&best)?;
        let selector = self.create_solution_selector();

        self.events.algorithm.emit(&AlgorithmEvent::Started {
            pool_size: population.len(),
        });
        info!(
            cost = best.cost(),
            unassigned = best.unassigned_jobs().len(),
            "search started"
        );

        let mut progress = SearchProgress::new(&self.params.terminations);
        let mut accepted = 0;
        let mut best_cost_history = vec![best.cost()];
        let mut next_progress_log = 1;

        // checked before every iteration, a criterion met upfront runs no iteration at all
        loop {
            if let Some(termination) = self
                .params
                .terminations
                .iter()
                .find(|termination| termination.is_met(&progress))
            {
                info!(
                    ?termination,
                    iterations = progress.iteration(),
                    "termination criterion met"
                );
                break;
            }

            let iteration = progress.iteration() + 1;
            let budget_spent = progress.budget_spent(&self.params.terminations);
            self.events
                .algorithm
                .emit(&AlgorithmEvent::IterationStarted { iteration });

            let strategy = self.strategies.pick_random(&mut rng)?;
            let discovered = strategy.run(
                &mut population,
                SearchContext {
                    problem: &self.problem,
                    constraints: &self.constraints,
                    states: &self.states,
                    neighborhoods: &self.neighborhoods,
                    cost_calculator: self.cost_calculator.as_ref(),
                    selector: &selector,
                    acceptor: &mut acceptor,
                    fleet: &mut fleet,
                    events: &self.events,
                    rng: &mut rng,
                    thread_pool: &self.thread_pool,
                    ruin_share: self.params.ruin_share,
                    vehicle_switch: self.params.vehicle_switch,
                    iteration,
                    progress: budget_spent,
                },
            )?;

            let cost = discovered.solution.cost();
            if discovered.accepted {
                accepted += 1;
            }

            self.events.algorithm.emit(&AlgorithmEvent::StrategySelected {
                iteration,
                strategy_id: discovered.strategy_id,
                accepted: discovered.accepted,
                cost,
            });

            let improved = cost < best.cost();
            if improved {
                debug!(iteration, cost, "new best solution");
                best = discovered.solution;
                best_cost_history.push(cost);
            }

            progress.record(improved, best.cost());
            self.events.algorithm.emit(&AlgorithmEvent::IterationEnded {
                iteration,
                best_cost: best.cost(),
            });

            if iteration >= next_progress_log {
                info!(
                    iteration,
                    best_cost = best.cost(),
                    unassigned = best.unassigned_jobs().len(),
                    "search progress"
                );
                next_progress_log *= 2;
            }
        }

        if self.params.verify {
            for solution in population.solutions().iter().chain(std::iter::once(&best)) {
                verifier::verify_solution(solution)?;
            }
        }

        self.events.algorithm.emit(&AlgorithmEvent::Ended {
            iterations: progress.iteration(),
            best_cost: best.cost(),
        });

        let mut solutions = population.into_solutions();
        solutions.push(best);

        Ok(AlgorithmResult {
            solutions,
            iterations: progress.iteration(),
            accepted,
            best_cost_history,
        })
    }

    /// Fills the population with the initial solutions, or with a solution constructed from the
    /// initial routes of the problem when none was given.
    fn seed_population(
        &mut self,
        population: &mut Population,
        fleet: &mut FleetManager,
        rng: &mut SmallRng,
    ) -> Result<(), SolverError> {
        let initial_solutions = std::mem::take(&mut self.initial_solutions);

        if initial_solutions.is_empty() {
            let solution = self.construct_solution(fleet, rng)?;
            population.push(solution);
            return Ok(());
        }

        for mut solution in initial_solutions {
            if !Arc::ptr_eq(solution.problem(), &self.problem) {
                return Err(SolverError::Verification(String::from(
                    "initial solution was built for another problem",
                )));
            }

            if let Err(error) = verifier::verify_solution(&solution) {
                warn!(%error, "initial solution does not account for every job");
            }

            if population.is_full() {
                warn!(
                    max_solutions = population.max_size(),
                    "population is full, initial solution ignored"
                );
                continue;
            }

            self.states.update_solution(&mut solution)?;
            let cost = self.cost_calculator.calculate(&solution)?;
            solution.set_cost(cost);
            population.push(solution);
        }

        Ok(())
    }

    fn construct_solution(
        &self,
        fleet: &mut FleetManager,
        rng: &mut SmallRng,
    ) -> Result<WorkingSolution, SolverError> {
        let recreate = self
            .strategies
            .strategies()
            .first()
            .map(SearchStrategy::recreate)
            .ok_or(SolverError::NoSearchStrategy)?;

        let mut solution = WorkingSolution::from_initial_routes(Arc::clone(&self.problem));
        self.states.update_solution(&mut solution)?;

        fleet.unlock_all();
        for route in solution.routes() {
            fleet.lock(&self.problem, route.vehicle())?;
        }

        let mut jobs: Vec<JobIdx> = solution.unassigned_jobs().iter().copied().collect();
        jobs.sort_unstable();

        recreate.insert_jobs(
            &mut solution,
            jobs,
            &mut RecreateContext {
                problem: &self.problem,
                constraints: &self.constraints,
                states: &self.states,
                fleet,
                events: &self.events,
                rng,
                thread_pool: &self.thread_pool,
                vehicle_switch: self.params.vehicle_switch,
            },
        )?;

        let cost = self.cost_calculator.calculate(&solution)?;
        solution.set_cost(cost);

        info!(
            %recreate,
            cost,
            routes = solution.routes().len(),
            unassigned = solution.unassigned_jobs().len(),
            "initial solution constructed"
        );

        Ok(solution)
    }

    fn create_solution_selector(&self) -> SolutionSelector {
        match self.params.solver_selector {
            SolverSelectorStrategy::SelectBest => SolutionSelector::SelectBest(SelectBestSelector),
            SolverSelectorStrategy::SelectRandom => {
                SolutionSelector::SelectRandom(SelectRandomSelector)
            }
        }
    }

    fn create_solution_acceptor(&self, best: &WorkingSolution) -> Result<SolutionAcceptor, SolverError> {
        let acceptor = match self.params.solver_acceptor {
            SolverAcceptorStrategy::Greedy => SolutionAcceptor::Greedy(GreedySolutionAcceptor),
            SolverAcceptorStrategy::Any => SolutionAcceptor::Any,
            SolverAcceptorStrategy::Schrimpf => {
                let initial_threshold = match self.params.schrimpf_initial_threshold {
                    Some(threshold) => threshold,
                    None => self.calibrate_threshold(best)?,
                };

                SolutionAcceptor::Schrimpf(SchrimpfAcceptor::new(
                    initial_threshold,
                    self.params.schrimpf_alpha,
                ))
            }
        };

        Ok(acceptor)
    }

    /// Derives the initial threshold from the spread of the costs visited by a random walk
    /// starting at `best`.
    fn calibrate_threshold(&self, best: &WorkingSolution) -> Result<f64, SolverError> {
        let random_walks = self.params.schrimpf_warmup_iterations;
        if random_walks == 0 {
            return Ok(0.0);
        }

        let costs = self.random_walk_costs(best, random_walks)?;
        let threshold = SchrimpfAcceptor::calibrate(&costs);

        debug!(random_walks, threshold, "calibrated threshold acceptance");

        Ok(threshold)
    }

    /// Costs of the start solution and of every step of a walk that keeps a single solution and
    /// always moves to the latest one.
    fn random_walk_costs(
        &self,
        start: &WorkingSolution,
        random_walks: usize,
    ) -> Result<Vec<f64>, SolverError> {
        let mut random_walk = Self::with_neighborhoods(
            Arc::clone(&self.problem),
            SolverParams {
                terminations: vec![Termination::Iterations(random_walks)],
                solver_acceptor: SolverAcceptorStrategy::Any,
                solver_selector: SolverSelectorStrategy::SelectBest,
                max_solutions: 1,
                verify: false,
                ..self.params.clone()
            },
            Arc::clone(&self.neighborhoods),
        )?;
        random_walk.constraints = self.constraints.clone();
        random_walk.states = self.states.clone();
        random_walk.cost_calculator = Arc::clone(&self.cost_calculator);
        random_walk.strategies = self.strategies.clone();
        random_walk.add_initial_solution(start.clone());

        let visited = Arc::new(Mutex::new(vec![start.cost()]));
        let sink = Arc::clone(&visited);
        random_walk
            .events
            .algorithm
            .subscribe(move |event: &AlgorithmEvent| {
                if let AlgorithmEvent::StrategySelected { cost, .. } = event {
                    sink.lock().push(*cost);
                }
            });

        random_walk.search()?;

        let costs = std::mem::take(&mut *visited.lock());
        Ok(costs)
    }
}
