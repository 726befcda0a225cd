use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SOUTHERNMOST_POINT: f64 = 94.972778;
pub const NORTHERNMOST_POINT: f64 = 141.019444;
pub const WESTERNMOST_POINT: f64 = 6.075;
pub const EASTERNMOST_POINT: f64 = -11.0075;

/// Zero-based column holding the trip origin.
pub const ORIGIN_COLUMN: usize = 9;
/// Zero-based column holding the trip destination.
pub const DESTINATION_COLUMN: usize = 12;

/// A validated `x,y` pair in degrees, exactly as read from the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box used to reject coordinates.
///
/// `y` must lie in `[south, north]` and `x` in `[east, west]`. The default
/// bounds are the source region's extremes and are not ordered like a
/// conventional west-less-than-east box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            south: SOUTHERNMOST_POINT,
            north: NORTHERNMOST_POINT,
            west: WESTERNMOST_POINT,
            east: EASTERNMOST_POINT,
        }
    }
}

impl Region {
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        !(coordinate.y < self.south
            || coordinate.y > self.north
            || coordinate.x > self.west
            || coordinate.x < self.east)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = String;

    /// 解析 `#rrggbb` 或 `#rrggbbaa`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{}' must start with '#'", s))?;

        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(format!("color '{}' must be #rrggbb or #rrggbbaa", s));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("color '{}' has an invalid hex digit", s))
        };

        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub color: Color,
    pub radius: f64,
}

impl Marker {
    pub fn new(position: Coordinate, color: Color, radius: f64) -> Self {
        Self {
            position,
            color,
            radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPath {
    pub points: Vec<Coordinate>,
    pub color: Color,
    pub width: f64,
}

impl MapPath {
    pub fn new(points: Vec<Coordinate>, color: Color, width: f64) -> Self {
        Self {
            points,
            color,
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Origin and destination markers only
    #[default]
    Plot,
    /// Markers plus a line joining origin and destination
    Line,
}

impl PlotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotMode::Plot => "plot",
            PlotMode::Line => "line",
        }
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling applied to every marker and path the accumulator creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub origin_color: Color,
    pub destination_color: Color,
    pub marker_radius: f64,
    pub path_color: Color,
    pub path_width: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            origin_color: Color::GREEN,
            destination_color: Color::RED,
            marker_radius: 4.0,
            path_color: Color::BLACK,
            path_width: 1.0,
        }
    }
}

/// 被略過的列，依錯誤種類計數
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub malformed: usize,
    pub not_a_number: usize,
    pub out_of_range: usize,
}

impl RejectionCounts {
    pub fn total(&self) -> usize {
        self.malformed + self.not_a_number + self.out_of_range
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccumulationSummary {
    /// Data rows examined after the header, valid or not.
    pub rows_examined: usize,
    pub rows_plotted: usize,
    pub rejections: RejectionCounts,
}

impl AccumulationSummary {
    pub fn rows_rejected(&self) -> usize {
        self.rejections.total()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotReport {
    pub output_path: String,
    pub summary: AccumulationSummary,
}
