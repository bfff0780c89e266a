use crate::config::ConfigError;
use crate::render::AssetError;
use crate::warehouse::WarehouseError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StormboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("Failed processing forecast frame")]
    Frame(#[from] PolarsError),

    #[error("Failed to bind server address '{0}'")]
    Bind(String, #[source] std::io::Error),

    #[error("Server terminated unexpectedly")]
    Serve(#[source] std::io::Error),
}
