mod config;
mod error;
mod filtering;
mod query;
mod render;
mod server;
mod stormboard;
mod types;
mod units;
mod warehouse;

pub use error::StormboardError;
pub use stormboard::Stormboard;

pub use config::{
    load_config, AssetConfig, ChartConfig, ConfigError, DashboardConfig, PageConfig, RegionConfig,
    ServerConfig, WarehouseConfig, WindowConfig, WindowMode,
};

pub use filtering::ForecastFrameFilterExt;
pub use query::ForecastQuery;

pub use types::forecast_frame::ForecastLazyFrame;
pub use types::forecast_row::{ForecastRow, DISPLAY_COLUMNS};
pub use types::polygon::{LonLat, Polygon};
pub use types::run_selection::RunSelection;
pub use units::{kelvin_to_fahrenheit, wind_speed_from_components};

pub use render::assets::{animation_data_url, read_image};
pub use render::chart::{forecast_chart, CHART_DIV_ID, PLOTLY_CDN};
pub use render::page::{error_page, render_page};
pub use render::table::forecast_table;
pub use render::AssetError;

pub use server::{router, serve, AppState};
pub use warehouse::{BigQueryClient, QueryRunner, WarehouseError};
