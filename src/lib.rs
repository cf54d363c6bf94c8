pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod image_source;
pub mod pipeline;
pub mod raster;
