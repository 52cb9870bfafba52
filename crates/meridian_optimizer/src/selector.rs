pub mod select_best_selector;
pub mod select_random_selector;
pub mod select_solution;
pub mod solution_selector;
