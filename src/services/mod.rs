pub mod auth;
pub mod blob;
pub mod cache;
pub mod registry;

#[cfg(test)]
pub mod testing;
