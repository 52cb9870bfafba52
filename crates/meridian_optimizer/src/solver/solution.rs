pub mod activity;
pub mod population;
pub mod route;
pub mod solution_document;
pub mod working_solution;
