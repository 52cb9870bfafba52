use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Args;
use meridian_optimizer::{
    json::problem_input::JsonVehicleRoutingProblem,
    solver::{
        algorithm::Algorithm,
        solution::{solution_document::SolutionDocument, working_solution::WorkingSolution},
        solver_params::{SolverAcceptorStrategy, SolverParams, Threads},
        state::StateManager,
        termination::Termination,
    },
};
use tracing::info;

use crate::{file_utils, parsers};

#[derive(Args)]
pub struct SolveArgs {
    /// JSON problem
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long, value_parser = parsers::parse_duration, default_value = "30s")]
    timeout: jiff::SignedDuration,

    #[arg(long, short = 'n')]
    iterations: Option<usize>,

    #[arg(long, default_value_t = 1)]
    threads: usize,

    #[arg(long)]
    seed: Option<u64>,

    /// Accept only improving solutions instead of threshold acceptance
    #[arg(long)]
    greedy: bool,

    /// Solution document used as the starting point
    #[arg(long)]
    initial: Option<PathBuf>,

    /// Write the solution document here instead of printing it
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub fn run(args: SolveArgs) -> Result<(), anyhow::Error> {
    let input: JsonVehicleRoutingProblem = file_utils::read_json(&args.input)
        .with_context(|| format!("failed to read problem {}", args.input.display()))?;
    let problem = Arc::new(input.into_problem()?);

    let defaults = SolverParams::default();
    let mut terminations = vec![Termination::Duration(args.timeout)];
    if let Some(iterations) = args.iterations {
        terminations.push(Termination::Iterations(iterations));
    }

    let mut algorithm = Algorithm::new(
        Arc::clone(&problem),
        SolverParams {
            terminations,
            insertion_threads: Threads::Multi(args.threads),
            solver_acceptor: if args.greedy {
                SolverAcceptorStrategy::Greedy
            } else {
                defaults.solver_acceptor
            },
            seed: args.seed.unwrap_or(defaults.seed),
            verify: true,
            ..defaults
        },
    )?;

    if let Some(initial) = &args.initial {
        let document: SolutionDocument = file_utils::read_json(initial)
            .with_context(|| format!("failed to read solution {}", initial.display()))?;
        algorithm.add_initial_solution(WorkingSolution::from_document(
            Arc::clone(&problem),
            &document,
            &StateManager::default(),
        )?);
    }

    let result = algorithm.search()?;
    let best = result
        .best_solution()
        .context("search ended without a solution")?;

    info!(
        iterations = result.iterations,
        accepted = result.accepted,
        improvements = result.best_cost_history.len(),
        cost = best.cost(),
        routes = best.non_empty_routes_iter().count(),
        unassigned = best.unassigned_jobs().len(),
        "search finished"
    );

    let document = best.to_document();
    match &args.out {
        Some(out) => {
            file_utils::write_json(out, &document)?;
            info!("solution written to {}", out.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }

    Ok(())
}
