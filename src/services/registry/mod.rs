pub mod client;
pub mod postgres;

pub use client::{Agent, Registry, RegistryError};
pub use postgres::PgRegistry;
