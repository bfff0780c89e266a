pub mod assets;
pub mod chart;
pub mod page;
pub mod table;

pub use assets::AssetError;
