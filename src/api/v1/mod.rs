/*
 * Responsibility
 * - v1 の公開面 (routes() の re-export と、middleware が埋める extractor 型)
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
