pub mod assistant;
pub mod summary;
