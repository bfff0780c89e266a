use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("Failed to construct the warehouse HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Query request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    // The warehouse answered, but refused the query (bad credential,
    // malformed SQL, missing table, exhausted quota, ...).
    #[error("Warehouse rejected the query with status {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Failed to decode the query reply from {0}")]
    ReplyDecode(String, #[source] reqwest::Error),

    #[error("Query accepted but not finished within the request; job polling is not supported")]
    JobIncomplete,

    #[error("Query reply carries no result schema")]
    MissingSchema,

    #[error("Reply row {row} has {found} cells but the schema expects {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unparsable {kind} value in column '{column}' at row {row}: '{value}'")]
    CellParse {
        kind: &'static str,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Failed to assemble the reply DataFrame: {0}")]
    DataFrameBuild(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
