pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::ImageStorage, RunConfig};

pub use adapters::canvas::StaticMap;
pub use crate::core::{
    accumulator::{accumulate, AccumulatorOptions},
    coordinate::{parse_coordinate, CoordinateError},
    engine::PlotEngine,
};
pub use domain::model::{Coordinate, PlotMode, Region};
pub use utils::error::{PlotError, Result};
