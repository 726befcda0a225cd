pub mod accumulator;
pub mod coordinate;
pub mod engine;

pub use crate::domain::model::{AccumulationSummary, PlotReport};
pub use crate::domain::ports::{ConfigProvider, MapContext, Renderer, Storage};
pub use crate::utils::error::Result;
