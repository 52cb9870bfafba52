use std::{hint::black_box, sync::Arc};

use criterion::{Criterion, criterion_group, criterion_main};
use meridian_optimizer::{
    problem::{
        capacity::Capacity,
        fleet::Fleet,
        job::{Job, JobBuilder, JobTask},
        location::{Location, LocationIdx},
        vehicle::VehicleBuilder,
        vehicle_routing_problem::{VehicleRoutingProblem, VehicleRoutingProblemBuilder},
    },
    solver::{
        algorithm::Algorithm,
        constraints::ConstraintManager,
        events::EventHub,
        fleet_manager::FleetManager,
        recreate::{
            recreate_context::RecreateContext, recreate_solution::RecreateSolution,
            recreate_strategy::RecreateStrategy,
        },
        ruin::job_neighborhoods::{AverageJobDistance, JobNeighborhoods},
        solution::working_solution::WorkingSolution,
        solver_params::{SolverParams, Threads},
        state::StateManager,
        termination::Termination,
    },
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

fn create_problem(num_jobs: usize, num_vehicles: usize) -> VehicleRoutingProblem {
    let mut rng = SmallRng::seed_from_u64(7);

    let mut locations = vec![Location::from_cartesian(50.0, 50.0)];
    let jobs: Vec<Job> = (0..num_jobs)
        .map(|index| {
            locations.push(Location::from_cartesian(
                rng.random_range(0.0..100.0),
                rng.random_range(0.0..100.0),
            ));

            let mut builder = JobBuilder::service(
                format!("s{index}"),
                JobTask::new(LocationIdx::new(index + 1)).with_duration(5.0),
            );
            builder.set_demand(Capacity::from_vec(vec![rng.random_range(1.0..5.0)]));
            builder.build()
        })
        .collect();

    let vehicles = (0..num_vehicles)
        .map(|index| {
            let mut builder = VehicleBuilder::new(format!("v{index}"), LocationIdx::new(0));
            builder.set_capacity(Capacity::from_vec(vec![40.0]));
            builder.build()
        })
        .collect();

    let mut builder = VehicleRoutingProblemBuilder::default();
    builder.set_locations(locations);
    builder.set_jobs(jobs);
    builder.set_fleet(Fleet::Finite(vehicles));

    builder.build().unwrap()
}

/// Solution with every job but the last one inserted.
fn create_partial_solution(
    problem: &Arc<VehicleRoutingProblem>,
    constraints: &ConstraintManager,
    states: &StateManager,
    thread_pool: &rayon::ThreadPool,
) -> WorkingSolution {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut fleet = FleetManager::new(problem, SmallRng::seed_from_u64(2)).unwrap();
    let events = EventHub::default();
    let mut solution = WorkingSolution::new(Arc::clone(problem));

    let jobs = problem.job_indices().take(problem.jobs().len() - 1).collect();
    RecreateStrategy::BestInsertion
        .insert_jobs(
            &mut solution,
            jobs,
            &mut RecreateContext {
                problem,
                constraints,
                states,
                fleet: &mut fleet,
                events: &events,
                rng: &mut rng,
                thread_pool,
                vehicle_switch: false,
            },
        )
        .unwrap();

    solution
}

fn insertion_benchmark(c: &mut Criterion) {
    let problem = Arc::new(create_problem(200, 20));
    let constraints = ConstraintManager::with_default_constraints();
    let states = StateManager::default();
    let events = EventHub::default();

    for threads in [Threads::Single, Threads::Multi(4)] {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.number_of_threads())
            .build()
            .unwrap();
        let solution = create_partial_solution(&problem, &constraints, &states, &thread_pool);
        let job_id = problem.job_indices().last().unwrap();

        let mut fleet = FleetManager::new(&problem, SmallRng::seed_from_u64(2)).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let context = RecreateContext {
            problem: &problem,
            constraints: &constraints,
            states: &states,
            fleet: &mut fleet,
            events: &events,
            rng: &mut rng,
            thread_pool: &thread_pool,
            vehicle_switch: false,
        };

        c.bench_function(&format!("evaluate insertions ({threads:?})"), |b| {
            b.iter(|| context.evaluate_insertions(black_box(&solution), black_box(job_id)))
        });
    }
}

fn neighborhoods_benchmark(c: &mut Criterion) {
    let problem = create_problem(500, 10);

    c.bench_function("job neighborhoods (500 jobs)", |b| {
        b.iter(|| JobNeighborhoods::new(black_box(&problem), &AverageJobDistance, Some(100)))
    });
}

fn search_benchmark(c: &mut Criterion) {
    let problem = Arc::new(create_problem(100, 10));

    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.bench_function("200 iterations (100 jobs)", |b| {
        b.iter(|| {
            let mut algorithm = Algorithm::new(
                Arc::clone(&problem),
                SolverParams {
                    terminations: vec![Termination::Iterations(200)],
                    insertion_threads: Threads::Single,
                    ..SolverParams::default()
                },
            )
            .unwrap();

            algorithm.search().unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    insertion_benchmark,
    neighborhoods_benchmark,
    search_benchmark
);
criterion_main!(benches);
