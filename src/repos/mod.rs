pub mod error;
pub mod object_repo;
pub mod registry_repo;
