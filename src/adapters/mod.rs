// Adapters layer: concrete implementations for external systems (rendering, storage lives in config::cli)

pub mod canvas;
