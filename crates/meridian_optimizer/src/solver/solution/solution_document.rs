use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{SolutionError, SolverError},
    problem::{
        job::{JobIdx, JobKind},
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    solver::{
        solution::{
            activity::{ActivityKind, TourActivity},
            route::VehicleRoute,
            working_solution::WorkingSolution,
        },
        state::StateManager,
    },
};

const NO_DRIVER: &str = "noDriver";

/// Serialized shape of a solution, as written and read by external tools.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SolutionDocument {
    pub cost: f64,
    pub routes: Vec<RouteDocument>,
    pub unassigned_jobs: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    pub vehicle_id: String,
    pub driver_id: String,
    pub departure_time: f64,
    pub activities: Vec<ActivityDocument>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDocument {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub arrival_time: f64,
    pub end_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    Service,
    Pickup,
    Delivery,
    Break,
}

impl From<ActivityKind> for ActivityType {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Service(_) => ActivityType::Service,
            ActivityKind::Pickup(_) => ActivityType::Pickup,
            ActivityKind::Delivery(_) => ActivityType::Delivery,
            ActivityKind::Break => ActivityType::Break,
        }
    }
}

impl WorkingSolution {
    pub fn to_document(&self) -> SolutionDocument {
        let problem = self.problem();
        let routes = self
            .non_empty_routes_iter()
            .map(|route| RouteDocument {
                vehicle_id: problem.vehicle(route.vehicle()).id().to_owned(),
                driver_id: NO_DRIVER.to_owned(),
                departure_time: route.departure_time(),
                activities: route
                    .activities()
                    .iter()
                    .map(|activity| ActivityDocument {
                        activity_type: activity.kind().into(),
                        job_id: activity.job().map(|job_id| problem.job(job_id).id().to_owned()),
                        arrival_time: activity.arrival_time(),
                        end_time: activity.end_time(),
                    })
                    .collect(),
            })
            .collect();

        let mut unassigned_jobs: Vec<String> = self
            .unassigned_jobs()
            .iter()
            .map(|&job_id| problem.job(job_id).id().to_owned())
            .collect();
        unassigned_jobs.sort_unstable();

        SolutionDocument {
            cost: self.cost(),
            routes,
            unassigned_jobs,
        }
    }

    /// Rebuilds a solution from its serialized shape. A job may be planned once at most, jobs
    /// neither planned nor listed as unassigned are left unassigned.
    pub fn from_document(
        problem: Arc<VehicleRoutingProblem>,
        document: &SolutionDocument,
        state_manager: &StateManager,
    ) -> Result<WorkingSolution, SolverError> {
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        let mut planned = FxHashSet::default();
        let mut used_vehicles = FxHashSet::default();

        for route_document in &document.routes {
            let vehicle_id = problem
                .vehicle_by_id(&route_document.vehicle_id)
                .ok_or_else(|| SolutionError::UnknownVehicle(route_document.vehicle_id.clone()))?;

            if !problem.fleet().is_infinite() && !used_vehicles.insert(vehicle_id) {
                return Err(SolutionError::DuplicateVehicle(route_document.vehicle_id.clone()).into());
            }

            let mut route = VehicleRoute::new(&problem, vehicle_id);
            route.set_departure_time(route_document.departure_time.max(route.departure_time()));

            let mut open_shipments: FxHashMap<JobIdx, TourActivity> = FxHashMap::default();
            for activity_document in &route_document.activities {
                if let Some(activity) = resolve_activity(
                    &problem,
                    &route,
                    activity_document,
                    &mut planned,
                    &mut open_shipments,
                )? {
                    route.insert_activity(route.len(), activity);
                }
            }

            if let Some(job_id) = open_shipments.keys().next() {
                return Err(SolutionError::IncompleteShipment(problem.job(*job_id).id().to_owned()).into());
            }

            state_manager.update_route(&problem, &mut route)?;
            solution.add_route(route);
        }

        for job_id in &planned {
            solution.mark_assigned(*job_id);
        }

        for id in &document.unassigned_jobs {
            let job_id = problem
                .job_by_id(id)
                .ok_or_else(|| SolutionError::UnknownJob(id.clone()))?;
            if planned.contains(&job_id) {
                return Err(SolutionError::DuplicateJob(id.clone()).into());
            }
        }

        let listed: FxHashSet<&str> = document.unassigned_jobs.iter().map(String::as_str).collect();
        let missing: Vec<&str> = problem
            .jobs()
            .iter()
            .enumerate()
            .filter(|(index, job)| !planned.contains(&JobIdx::new(*index)) && !listed.contains(job.id()))
            .map(|(_, job)| job.id())
            .collect();
        if !missing.is_empty() {
            warn!(
                missing = missing.len(),
                first = missing[0],
                "document does not account for every job, missing jobs are left unassigned"
            );
        }

        solution.set_cost(document.cost);
        Ok(solution)
    }
}

fn resolve_activity(
    problem: &VehicleRoutingProblem,
    route: &VehicleRoute,
    document: &ActivityDocument,
    planned: &mut FxHashSet<JobIdx>,
    open_shipments: &mut FxHashMap<JobIdx, TourActivity>,
) -> Result<Option<TourActivity>, SolutionError> {
    let Some(id) = document.job_id.as_deref() else {
        let vehicle = problem.vehicle(route.vehicle());
        return match (document.activity_type, vehicle.vehicle_break()) {
            (ActivityType::Break, Some(vehicle_break)) => Ok(Some(TourActivity::for_break(
                vehicle_break,
                route.end_location(problem),
            ))),
            _ => Err(SolutionError::ActivityMismatch {
                job: vehicle.id().to_owned(),
                kind: format!("{:?}", document.activity_type),
            }),
        };
    };

    let job_id = problem
        .job_by_id(id)
        .ok_or_else(|| SolutionError::UnknownJob(id.to_owned()))?;
    let job = problem.job(job_id);
    let mismatch = || SolutionError::ActivityMismatch {
        job: id.to_owned(),
        kind: format!("{:?}", document.activity_type),
    };

    let activities = TourActivity::for_job(job_id, job);
    match (job.kind(), document.activity_type) {
        (JobKind::Shipment { .. }, ActivityType::Pickup) => {
            if planned.contains(&job_id) || open_shipments.contains_key(&job_id) {
                return Err(SolutionError::DuplicateJob(id.to_owned()));
            }
            let mut activities = activities.into_iter();
            let pickup = activities.next().ok_or_else(mismatch)?;
            let delivery = activities.next().ok_or_else(mismatch)?;
            open_shipments.insert(job_id, delivery);
            Ok(Some(pickup))
        }
        (JobKind::Shipment { .. }, ActivityType::Delivery) => {
            let delivery = open_shipments
                .remove(&job_id)
                .ok_or_else(|| SolutionError::IncompleteShipment(id.to_owned()))?;
            planned.insert(job_id);
            Ok(Some(delivery))
        }
        (JobKind::Service(_), ActivityType::Service)
        | (JobKind::Pickup(_), ActivityType::Pickup)
        | (JobKind::Delivery(_), ActivityType::Delivery) => {
            if !planned.insert(job_id) {
                return Err(SolutionError::DuplicateJob(id.to_owned()));
            }
            Ok(activities.into_iter().next())
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test_utils::{self, TestRoute};

    use super::*;

    #[test]
    fn test_document_round_trip_keeps_routes() {
        let locations = test_utils::create_location_grid(3, 3);
        let jobs = vec![
            test_utils::create_shipment("s", 1, 4, 1.0),
            test_utils::create_service_with_demand("a", 2, 1.0),
            test_utils::create_service_with_demand("b", 5, 1.0),
        ];
        let vehicles = test_utils::create_basic_vehicles(vec![0]);
        let problem = Arc::new(test_utils::create_test_problem(locations, jobs, vehicles));
        let solution = test_utils::create_test_working_solution(
            Arc::clone(&problem),
            vec![TestRoute {
                vehicle_id: 0,
                service_ids: vec![0, 1, 0],
            }],
        );

        let document = solution.to_document();
        assert_eq!(document.unassigned_jobs, vec!["b".to_owned()]);

        let json = serde_json::to_string(&document).unwrap();
        let parsed: SolutionDocument = serde_json::from_str(&json).unwrap();
        let rebuilt =
            WorkingSolution::from_document(Arc::clone(&problem), &parsed, &StateManager::default())
                .unwrap();

        assert!(rebuilt.is_identical(&solution));
        assert_eq!(rebuilt.to_document().routes, document.routes);
    }

    #[test]
    fn test_document_with_unknown_job_is_rejected() {
        let locations = test_utils::create_location_grid(2, 2);
        let problem = Arc::new(test_utils::create_test_problem(
            locations,
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let document = SolutionDocument {
            cost: 0.0,
            routes: vec![RouteDocument {
                vehicle_id: "0".to_owned(),
                driver_id: NO_DRIVER.to_owned(),
                departure_time: 0.0,
                activities: vec![ActivityDocument {
                    activity_type: ActivityType::Service,
                    job_id: Some("nope".to_owned()),
                    arrival_time: 0.0,
                    end_time: 0.0,
                }],
            }],
            unassigned_jobs: vec![],
        };

        let result = WorkingSolution::from_document(problem, &document, &StateManager::default());
        assert!(matches!(
            result,
            Err(SolverError::Solution(SolutionError::UnknownJob(_)))
        ));
    }

    #[test]
    fn test_document_missing_a_job_leaves_it_unassigned() {
        let locations = test_utils::create_location_grid(2, 2);
        let problem = Arc::new(test_utils::create_test_problem(
            locations,
            test_utils::create_basic_services(vec![1, 2]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let document = SolutionDocument {
            cost: 0.0,
            routes: vec![RouteDocument {
                vehicle_id: "0".to_owned(),
                driver_id: NO_DRIVER.to_owned(),
                departure_time: 0.0,
                activities: vec![ActivityDocument {
                    activity_type: ActivityType::Service,
                    job_id: Some("0".to_owned()),
                    arrival_time: 0.0,
                    end_time: 0.0,
                }],
            }],
            unassigned_jobs: vec![],
        };

        let solution =
            WorkingSolution::from_document(problem, &document, &StateManager::default()).unwrap();

        assert_eq!(solution.routes()[0].jobs(), vec![JobIdx::new(0)]);
        assert!(solution.is_unassigned(JobIdx::new(1)));
        assert!(!solution.is_unassigned(JobIdx::new(0)));
    }

    #[test]
    fn test_document_unassigned_and_planned_is_rejected() {
        let locations = test_utils::create_location_grid(2, 2);
        let problem = Arc::new(test_utils::create_test_problem(
            locations,
            test_utils::create_basic_services(vec![1]),
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let document = SolutionDocument {
            cost: 0.0,
            routes: vec![RouteDocument {
                vehicle_id: "0".to_owned(),
                driver_id: NO_DRIVER.to_owned(),
                departure_time: 0.0,
                activities: vec![ActivityDocument {
                    activity_type: ActivityType::Service,
                    job_id: Some("0".to_owned()),
                    arrival_time: 0.0,
                    end_time: 0.0,
                }],
            }],
            unassigned_jobs: vec!["0".to_owned()],
        };

        let result = WorkingSolution::from_document(problem, &document, &StateManager::default());
        assert!(matches!(
            result,
            Err(SolverError::Solution(SolutionError::DuplicateJob(id))) if id == "0"
        ));
    }

    #[test]
    fn test_delivery_before_pickup_is_rejected() {
        let locations = test_utils::create_location_grid(2, 2);
        let problem = Arc::new(test_utils::create_test_problem(
            locations,
            vec![test_utils::create_shipment("s", 1, 2, 1.0)],
            test_utils::create_basic_vehicles(vec![0]),
        ));
        let activity = |activity_type| ActivityDocument {
            activity_type,
            job_id: Some("s".to_owned()),
            arrival_time: 0.0,
            end_time: 0.0,
        };
        let document = SolutionDocument {
            cost: 0.0,
            routes: vec![RouteDocument {
                vehicle_id: "0".to_owned(),
                driver_id: NO_DRIVER.to_owned(),
                departure_time: 0.0,
                activities: vec![activity(ActivityType::Delivery), activity(ActivityType::Pickup)],
            }],
            unassigned_jobs: vec![],
        };

        let result = WorkingSolution::from_document(problem, &document, &StateManager::default());
        assert!(matches!(
            result,
            Err(SolverError::Solution(SolutionError::IncompleteShipment(_)))
        ));
    }
}
