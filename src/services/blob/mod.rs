pub mod postgres;
pub mod store;

pub use postgres::PgBlobStore;
pub use store::{BlobStore, StoreError};
