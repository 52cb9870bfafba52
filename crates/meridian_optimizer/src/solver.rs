pub mod algorithm;
pub mod constraints;
pub mod cost;
pub mod events;
pub mod fleet_manager;
pub mod insertion;
pub mod recreate;
pub mod ruin;
pub mod search_strategy;
pub mod search_strategy_manager;
pub mod solution;
pub mod solver_params;
pub mod state;
pub mod termination;
pub mod verifier;
