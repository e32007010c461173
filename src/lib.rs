pub mod config;
pub mod data;

pub use data::MapData;
