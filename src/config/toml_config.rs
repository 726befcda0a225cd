use crate::domain::model::{PlotStyle, Region, DESTINATION_COLUMN, ORIGIN_COLUMN};
use crate::utils::error::{PlotError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional overrides loaded from a TOML file. Every table may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub region: Region,
    pub columns: ColumnConfig,
    pub image: Option<ImageConfig>,
    pub style: PlotStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub origin: usize,
    pub destination: usize,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            origin: ORIGIN_COLUMN,
            destination: DESTINATION_COLUMN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PlotError::ConfigError {
            message: format!("Cannot read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAP_NORTH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlotError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn width(&self) -> Option<u32> {
        self.image.and_then(|i| i.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.image.and_then(|i| i.height)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_region("region", &self.region)?;
        crate::utils::validation::validate_style("style", &self.style)?;

        if self.columns.origin == self.columns.destination {
            return Err(PlotError::InvalidConfigValueError {
                field: "columns.destination".to_string(),
                value: self.columns.destination.to_string(),
                reason: "Origin and destination must be different columns".to_string(),
            });
        }

        if let Some(width) = self.width() {
            crate::utils::validation::validate_positive_number("image.width", width as usize, 1)?;
        }
        if let Some(height) = self.height() {
            crate::utils::validation::validate_positive_number("image.height", height as usize, 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Color;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.columns.origin, 9);
        assert_eq!(config.columns.destination, 12);
        assert_eq!(config.style.marker_radius, 4.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r##"
[region]
south = 100.0
north = 110.0
west = 2.0
east = -2.0

[columns]
origin = 1
destination = 2

[image]
width = 800

[style]
origin_color = "#0000ff"
path_width = 2.5
"##;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.region.south, 100.0);
        assert_eq!(config.region.east, -2.0);
        assert_eq!(config.columns, ColumnConfig { origin: 1, destination: 2 });
        assert_eq!(config.width(), Some(800));
        assert_eq!(config.height(), None);
        assert_eq!(config.style.origin_color, Color::rgb(0, 0, 0xff));
        assert_eq!(config.style.destination_color, Color::RED);
        assert_eq!(config.style.path_width, 2.5);
    }

    #[test]
    fn test_partial_region_keeps_other_bounds() {
        let config = TomlConfig::from_toml_str("[region]\nnorth = 120.0\n").unwrap();
        assert_eq!(config.region.north, 120.0);
        assert_eq!(config.region.south, Region::default().south);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TRIP_MAP_TEST_NORTH", "130.5");

        let config =
            TomlConfig::from_toml_str("[region]\nnorth = ${TRIP_MAP_TEST_NORTH}\n").unwrap();
        assert_eq!(config.region.north, 130.5);

        std::env::remove_var("TRIP_MAP_TEST_NORTH");
    }

    #[test]
    fn test_invalid_toml_reports_parsing_error() {
        let err = TomlConfig::from_toml_str("[style]\norigin_color = \"green\"\n").unwrap_err();
        assert!(matches!(err, PlotError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let inverted = TomlConfig::from_toml_str("[region]\nsouth = 150.0\n").unwrap();
        assert!(inverted.validate().is_err());

        let same_columns =
            TomlConfig::from_toml_str("[columns]\norigin = 3\ndestination = 3\n").unwrap();
        assert!(same_columns.validate().is_err());

        let zero_width = TomlConfig::from_toml_str("[image]\nwidth = 0\n").unwrap();
        assert!(zero_width.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[image]\nwidth = 320\nheight = 240\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.width(), Some(320));
        assert_eq!(config.height(), Some(240));
    }

    #[test]
    fn test_missing_config_file_names_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let err = TomlConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, PlotError::ConfigError { .. }));
        assert!(err.user_friendly_message().contains("absent.toml"));
    }
}
