pub mod forecast_frame;
pub mod forecast_row;
pub mod polygon;
pub mod run_selection;

pub use forecast_frame::ForecastLazyFrame;
pub use forecast_row::ForecastRow;
pub use polygon::{LonLat, Polygon};
pub use run_selection::RunSelection;
