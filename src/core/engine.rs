use crate::adapters::canvas::StaticMap;
use crate::config::cli::output_file_name;
use crate::core::accumulator::{accumulate, AccumulatorOptions};
use crate::core::{
    AccumulationSummary, ConfigProvider, MapContext, PlotReport, Renderer, Result, Storage,
};
use crate::utils::error::PlotError;
use crate::utils::monitor::SystemMonitor;
use std::fs::{self, File};
use std::io::BufReader;

pub struct PlotEngine<C: ConfigProvider, S: Storage> {
    config: C,
    storage: S,
    monitor: SystemMonitor,
}

impl<C: ConfigProvider, S: Storage> PlotEngine<C, S> {
    pub fn new(config: C, storage: S) -> Self {
        Self::new_with_monitoring(config, storage, false)
    }

    pub fn new_with_monitoring(config: C, storage: S, monitor_enabled: bool) -> Self {
        Self {
            config,
            storage,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn run(&self) -> Result<PlotReport> {
        tracing::info!(
            "Starting plot of {} (mode: {}, limit: {})",
            self.config.input_file(),
            self.config.mode(),
            self.config.limit()
        );
        self.monitor.log_stats("Start");

        // Read
        let (width, height) = self.config.image_size();
        let mut map =
            StaticMap::new(width, height).with_fallback_center(self.config.region().center());
        let summary = self.read_trips(&mut map)?;
        tracing::info!(
            "Read {} rows, plotted {} trips ({} markers, {} paths)",
            summary.rows_examined,
            summary.rows_plotted,
            map.markers().len(),
            map.paths().len()
        );
        self.monitor.log_stats("Read");

        // Render
        let image = map.render()?;
        self.monitor.log_stats("Render");

        // Save
        let file_name = output_file_name(
            self.config.input_file(),
            self.config.mode(),
            summary.rows_examined,
            chrono::Utc::now().timestamp(),
        );
        let output_path = self.storage.save_png(&file_name, &image)?;
        tracing::info!("Image saved to: {}", output_path);
        self.monitor.log_stats("Save");
        self.monitor.log_final_stats();

        Ok(PlotReport {
            output_path,
            summary,
        })
    }

    fn read_trips(&self, map: &mut StaticMap) -> Result<AccumulationSummary> {
        let input = self.config.input_file();

        if fs::metadata(input).map(|m| m.is_dir()).unwrap_or(false) {
            return Err(PlotError::BadInput {
                path: input.to_string(),
            });
        }

        let file = File::open(input)?;
        accumulate(BufReader::new(file), &self.accumulator_options(), map)
    }

    fn accumulator_options(&self) -> AccumulatorOptions {
        let (origin_column, destination_column) = self.config.columns();
        AccumulatorOptions {
            limit: self.config.limit(),
            mode: self.config.mode(),
            region: self.config.region(),
            origin_column,
            destination_column,
            style: self.config.style().clone(),
        }
    }
}
