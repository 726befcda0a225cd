use crate::domain::model::{PlotStyle, Region};
use crate::utils::error::{PlotError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(PlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

/// Bounds must be finite degrees with `south <= north` and `east <= west`.
pub fn validate_region(field_name: &str, region: &Region) -> Result<()> {
    for (name, value) in [
        ("south", region.south),
        ("north", region.north),
        ("west", region.west),
        ("east", region.east),
    ] {
        let field = format!("{}.{}", field_name, name);
        validate_finite(&field, value)?;
        validate_range(&field, value, -180.0, 180.0)?;
    }

    if region.south > region.north {
        return Err(PlotError::InvalidConfigValueError {
            field: format!("{}.south", field_name),
            value: region.south.to_string(),
            reason: format!("South bound exceeds north bound {}", region.north),
        });
    }

    if region.east > region.west {
        return Err(PlotError::InvalidConfigValueError {
            field: format!("{}.east", field_name),
            value: region.east.to_string(),
            reason: format!("East bound exceeds west bound {}", region.west),
        });
    }

    Ok(())
}

pub fn validate_style(field_name: &str, style: &PlotStyle) -> Result<()> {
    for (name, value) in [
        ("marker_radius", style.marker_radius),
        ("path_width", style.path_width),
    ] {
        let field = format!("{}.{}", field_name, name);
        validate_finite(&field, value)?;
        validate_range(&field, value, 0.0, 100.0)?;
    }
    Ok(())
}
