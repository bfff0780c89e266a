use crate::warehouse::error::WarehouseError;
use async_trait::async_trait;
use polars::frame::DataFrame;

/// Executes SQL against the hosted forecast warehouse.
///
/// The dashboard depends on this seam rather than on a concrete client, so
/// the pipeline stays pure up to the wire call and tests can substitute a
/// canned runner. [`crate::BigQueryClient`] is the production implementation.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Runs one SQL statement and returns the reply as a `DataFrame`.
    ///
    /// An empty result is not an error: the returned frame then has zero
    /// rows but still carries the reply schema's columns.
    async fn run_query(&self, sql: &str) -> Result<DataFrame, WarehouseError>;
}
