pub mod cli;
pub mod toml_config;

use crate::adapters::canvas::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::core::ConfigProvider;
use crate::domain::model::{PlotMode, PlotStyle, Region, DESTINATION_COLUMN, ORIGIN_COLUMN};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

pub const DEFAULT_OUTPUT_DIR: &str = "images";

#[cfg(feature = "cli")]
pub const USAGE: &str = "Usage: trip-map --file <filename> --mode [plot|line] --limit [0|N]";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "trip-map")]
#[command(about = "Plot trip origins and destinations from a CSV file onto a PNG map")]
pub struct CliConfig {
    /// Input CSV file
    #[arg(short, long, default_value = "")]
    pub file: String,

    /// plot: markers only, line: markers joined by a line
    #[arg(short, long, value_enum, default_value_t = PlotMode::Plot)]
    pub mode: PlotMode,

    /// Maximum number of data rows to read (0 = all)
    #[arg(short, long, default_value = "0")]
    pub limit: usize,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    #[arg(long, help = "Image width in pixels [default: 600]")]
    pub width: Option<u32>,

    #[arg(long, help = "Image height in pixels [default: 400]")]
    pub height: Option<u32>,

    /// TOML file with region, column and style overrides
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併命令列參數與 TOML 配置
    pub fn resolve(&self) -> Result<RunConfig> {
        let file_config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                file_config
            }
            None => TomlConfig::default(),
        };

        Ok(RunConfig::from_parts(
            self.file.clone(),
            self.mode,
            self.limit,
            self.output_dir.clone(),
            self.width,
            self.height,
            file_config,
        ))
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input_file: String,
    pub mode: PlotMode,
    pub limit: usize,
    pub output_dir: String,
    pub width: u32,
    pub height: u32,
    pub region: Region,
    pub origin_column: usize,
    pub destination_column: usize,
    pub style: PlotStyle,
}

impl RunConfig {
    pub fn new(input_file: impl Into<String>, mode: PlotMode, limit: usize) -> Self {
        Self {
            input_file: input_file.into(),
            mode,
            limit,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            region: Region::default(),
            origin_column: ORIGIN_COLUMN,
            destination_column: DESTINATION_COLUMN,
            style: PlotStyle::default(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Explicit `width`/`height` win over the file's `[image]` table.
    pub fn from_parts(
        input_file: String,
        mode: PlotMode,
        limit: usize,
        output_dir: String,
        width: Option<u32>,
        height: Option<u32>,
        file_config: TomlConfig,
    ) -> Self {
        Self {
            width: width.or(file_config.width()).unwrap_or(DEFAULT_WIDTH),
            height: height.or(file_config.height()).unwrap_or(DEFAULT_HEIGHT),
            input_file,
            mode,
            limit,
            output_dir,
            region: file_config.region,
            origin_column: file_config.columns.origin,
            destination_column: file_config.columns.destination,
            style: file_config.style,
        }
    }
}

impl ConfigProvider for RunConfig {
    fn input_file(&self) -> &str {
        &self.input_file
    }

    fn mode(&self) -> PlotMode {
        self.mode
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn region(&self) -> Region {
        self.region
    }

    fn columns(&self) -> (usize, usize) {
        (self.origin_column, self.destination_column)
    }

    fn style(&self) -> &PlotStyle {
        &self.style
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("file", &self.input_file)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_positive_number("width", self.width as usize, 1)?;
        validation::validate_positive_number("height", self.height as usize, 1)?;
        validation::validate_region("region", &self.region)?;
        validation::validate_style("style", &self.style)?;

        if self.origin_column == self.destination_column {
            return Err(crate::utils::error::PlotError::InvalidConfigValueError {
                field: "columns.destination".to_string(),
                value: self.destination_column.to_string(),
                reason: "Origin and destination must be different columns".to_string(),
            });
        }

        Ok(())
    }
}
