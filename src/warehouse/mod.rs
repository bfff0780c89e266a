pub mod bigquery;
pub mod error;
mod response;
pub mod runner;

pub use bigquery::BigQueryClient;
pub use error::WarehouseError;
pub use runner::QueryRunner;
