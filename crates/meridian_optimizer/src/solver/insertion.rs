mod insertion_calculator;
mod insertion_data;

pub use insertion_calculator::InsertionCalculator;
pub use insertion_data::{InsertionData, InsertionTarget};
