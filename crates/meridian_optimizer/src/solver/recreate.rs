pub mod best_insertion;
pub mod break_scheduler;
pub mod recreate_context;
pub mod recreate_solution;
pub mod recreate_strategy;
pub mod regret_insertion;
