pub mod problem_input;
