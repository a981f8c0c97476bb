pub mod enrich;
pub mod model;
pub mod summary;
