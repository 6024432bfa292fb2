pub mod comparison;
pub mod resume;
pub mod snapshot;
