use std::path::PathBuf;

use clap::Args;
use meridian_optimizer::json::problem_input::{
    JsonJob, JsonJobKind, JsonTask, JsonVehicle, JsonVehicleRoutingProblem,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::info;

use crate::file_utils;

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of jobs
    #[arg(short, long, default_value_t = 100)]
    jobs: usize,

    /// Number of vehicles, all starting from the depot at the center of the grid
    #[arg(short, long, default_value_t = 10)]
    vehicles: usize,

    #[arg(short, long, default_value_t = 50.0)]
    capacity: f64,

    /// Share of the jobs generated as shipments
    #[arg(long, default_value_t = 0.2)]
    shipments: f64,

    #[arg(short, long, default_value_t = 100.0)]
    size: f64,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(short, long)]
    out: PathBuf,
}

fn random_location(rng: &mut SmallRng, locations: &mut Vec<[f64; 2]>, size: f64) -> usize {
    locations.push([rng.random_range(0.0..size), rng.random_range(0.0..size)]);
    locations.len() - 1
}

fn task(location_id: usize) -> JsonTask {
    JsonTask {
        location_id,
        duration: Some(10.0),
        time_window: None,
    }
}

pub fn generate_problem(args: &GenerateArgs) -> JsonVehicleRoutingProblem {
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut locations = vec![[args.size / 2.0, args.size / 2.0]];

    let jobs = (0..args.jobs)
        .map(|index| {
            let kind = if rng.random_bool(args.shipments.clamp(0.0, 1.0)) {
                JsonJobKind::Shipment {
                    pickup: task(random_location(&mut rng, &mut locations, args.size)),
                    delivery: task(random_location(&mut rng, &mut locations, args.size)),
                }
            } else {
                JsonJobKind::Service(task(random_location(&mut rng, &mut locations, args.size)))
            };

            JsonJob {
                id: format!("job{index}"),
                kind,
                demand: Some(vec![rng.random_range(1..=10) as f64]),
                skills: None,
            }
        })
        .collect();

    let vehicles = (0..args.vehicles)
        .map(|index| JsonVehicle {
            id: format!("vehicle{index}"),
            type_id: None,
            capacity: Some(vec![args.capacity]),
            start_location_id: 0,
            end_location_id: None,
            earliest_start: None,
            latest_arrival: None,
            should_return_to_depot: None,
            skills: None,
            vehicle_break: None,
            fixed_cost: None,
        })
        .collect();

    JsonVehicleRoutingProblem {
        locations,
        jobs,
        vehicles,
        infinite_fleet: false,
        initial_routes: Vec::new(),
        unassigned_job_penalty: None,
    }
}

pub fn run(args: GenerateArgs) -> Result<(), anyhow::Error> {
    let problem = generate_problem(&args);
    file_utils::write_json(&args.out, &problem)?;

    info!(
        jobs = problem.jobs.len(),
        vehicles = problem.vehicles.len(),
        "problem written to {}",
        args.out.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_problem_builds() {
        let args = GenerateArgs {
            jobs: 30,
            vehicles: 3,
            capacity: 40.0,
            shipments: 0.5,
            size: 50.0,
            seed: 4,
            out: PathBuf::from("unused.json"),
        };

        let input = generate_problem(&args);
        let problem = input.clone().into_problem().unwrap();

        assert_eq!(problem.jobs().len(), 30);
        assert_eq!(problem.vehicles().len(), 3);
        let shipments = problem.jobs().iter().filter(|job| job.is_shipment()).count();
        assert_eq!(input.locations.len(), 1 + 30 + shipments);
    }
}
