use crate::domain::model::{Coordinate, Region};
use thiserror::Error;

/// Placeholder written by upstream exports when a location is unknown.
pub const SENTINEL_COORDINATE: &str = "-999,-999";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("LatLong is incorrect")]
    Malformed,

    #[error("LatLong is not a number")]
    NotANumber,

    #[error("LatLong is out of range")]
    OutOfRange,
}

/// Parses a `"x,y"` field and checks it against `region`.
///
/// The pair is returned exactly as parsed. Surrounding whitespace on either
/// part is ignored.
pub fn parse_coordinate(raw: &str, region: &Region) -> Result<Coordinate, CoordinateError> {
    if raw.is_empty() || raw == "," || raw == SENTINEL_COORDINATE {
        return Err(CoordinateError::Malformed);
    }

    let mut parts = raw.split(',');
    let (x, y) = match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => (parse_degrees(x)?, parse_degrees(y)?),
        _ => return Err(CoordinateError::Malformed),
    };

    let coordinate = Coordinate::new(x, y);
    if !region.contains(&coordinate) {
        return Err(CoordinateError::OutOfRange);
    }

    Ok(coordinate)
}

fn parse_degrees(part: &str) -> Result<f64, CoordinateError> {
    let value: f64 = part
        .trim()
        .parse()
        .map_err(|_| CoordinateError::NotANumber)?;

    // "NaN" 與 "inf" 也能被 f64 解析
    if !value.is_finite() {
        return Err(CoordinateError::NotANumber);
    }

    Ok(value)
}
