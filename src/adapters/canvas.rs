use crate::domain::model::{Color, Coordinate, MapPath, Marker, Region};
use crate::domain::ports::{MapContext, Renderer};
use crate::utils::error::{PlotError, Result};
use image::{Rgba, RgbaImage};
use std::f64::consts::PI;

pub const DEFAULT_WIDTH: u32 = 600;
pub const DEFAULT_HEIGHT: u32 = 400;

const BACKGROUND: Color = Color::rgb(0xf2, 0xef, 0xe9);
const PADDING_PX: f64 = 16.0;
const MAX_LATITUDE: f64 = 85.051_128_78;
/// Pixels per world width at the closest zoom we fit to (tile zoom 15).
const MAX_SCALE: f64 = 256.0 * 32768.0;
/// Used when there is nothing, or a single point, to fit (tile zoom 10).
const DEFAULT_SCALE: f64 = 256.0 * 1024.0;

/// Static map canvas: collects markers and paths, then paints them onto an
/// RGBA image using a Web Mercator view fitted to their extent.
///
/// Coordinates are read with `x` as latitude and `y` as longitude.
#[derive(Debug, Clone)]
pub struct StaticMap {
    width: u32,
    height: u32,
    fallback_center: Coordinate,
    markers: Vec<Marker>,
    paths: Vec<MapPath>,
}

impl StaticMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fallback_center: Region::default().center(),
            markers: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Centre used when the map holds no objects.
    pub fn with_fallback_center(mut self, center: Coordinate) -> Self {
        self.fallback_center = center;
        self
    }

    fn all_points(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.markers
            .iter()
            .map(|m| &m.position)
            .chain(self.paths.iter().flat_map(|p| p.points.iter()))
    }

    fn viewport(&self) -> Viewport {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for point in self.all_points() {
            let (wx, wy) = world_position(point);
            min = (min.0.min(wx), min.1.min(wy));
            max = (max.0.max(wx), max.1.max(wy));
        }

        let (width, height) = (self.width as f64, self.height as f64);

        if !min.0.is_finite() {
            let (cx, cy) = world_position(&self.fallback_center);
            return Viewport::new(cx, cy, DEFAULT_SCALE, width, height);
        }

        let span_x = max.0 - min.0;
        let span_y = max.1 - min.1;
        let usable_w = (width - 2.0 * PADDING_PX).max(1.0);
        let usable_h = (height - 2.0 * PADDING_PX).max(1.0);

        let scale = if span_x <= f64::EPSILON && span_y <= f64::EPSILON {
            DEFAULT_SCALE
        } else {
            let sx = if span_x > 0.0 { usable_w / span_x } else { f64::INFINITY };
            let sy = if span_y > 0.0 { usable_h / span_y } else { f64::INFINITY };
            sx.min(sy).min(MAX_SCALE)
        };

        Viewport::new(
            (min.0 + max.0) / 2.0,
            (min.1 + max.1) / 2.0,
            scale,
            width,
            height,
        )
    }
}

impl MapContext for StaticMap {
    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn add_path(&mut self, path: MapPath) {
        self.paths.push(path);
    }

    fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn paths(&self) -> &[MapPath] {
        &self.paths
    }
}

impl Renderer for StaticMap {
    /// An empty map still renders: the background alone, centred on the
    /// fallback centre.
    fn render(&self) -> Result<RgbaImage> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::RenderError {
                message: format!("invalid image size {}x{}", self.width, self.height),
            });
        }

        let view = self.viewport();
        let mut img = RgbaImage::from_pixel(self.width, self.height, Rgba(BACKGROUND.to_rgba()));

        for path in &self.paths {
            let pixels: Vec<(f64, f64)> = path.points.iter().map(|p| view.to_pixel(p)).collect();
            for segment in pixels.windows(2) {
                draw_segment(&mut img, segment[0], segment[1], path.width, path.color);
            }
        }

        for marker in &self.markers {
            draw_disc(&mut img, view.to_pixel(&marker.position), marker.radius, marker.color);
        }

        tracing::debug!(
            "Rendered {} markers and {} paths at scale {:.1}",
            self.markers.len(),
            self.paths.len(),
            view.scale
        );

        Ok(img)
    }
}

struct Viewport {
    center_x: f64,
    center_y: f64,
    scale: f64,
    half_width: f64,
    half_height: f64,
}

impl Viewport {
    fn new(center_x: f64, center_y: f64, scale: f64, width: f64, height: f64) -> Self {
        Self {
            center_x,
            center_y,
            scale,
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    fn to_pixel(&self, coordinate: &Coordinate) -> (f64, f64) {
        let (wx, wy) = world_position(coordinate);
        (
            (wx - self.center_x) * self.scale + self.half_width,
            (wy - self.center_y) * self.scale + self.half_height,
        )
    }
}

/// Web Mercator position normalised to `[0, 1]` on both axes.
fn world_position(coordinate: &Coordinate) -> (f64, f64) {
    let lat = coordinate.x.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let lon = coordinate.y;

    let wx = (lon + 180.0) / 360.0;
    let wy = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (wx, wy)
}

fn draw_disc(img: &mut RgbaImage, center: (f64, f64), radius: f64, color: Color) {
    let radius = radius.max(0.5);
    fill_where(img, center, center, radius, color, |px, py| {
        let (dx, dy) = (px - center.0, py - center.1);
        dx * dx + dy * dy <= radius * radius
    });
}

fn draw_segment(img: &mut RgbaImage, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
    let half = (width / 2.0).max(0.5);
    fill_where(img, from, to, half, color, |px, py| {
        distance_to_segment((px, py), from, to) <= half
    });
}

/// Paints every pixel of the box spanning `a`..`b` (grown by `margin`) whose
/// centre satisfies `inside`.
fn fill_where<F>(
    img: &mut RgbaImage,
    a: (f64, f64),
    b: (f64, f64),
    margin: f64,
    color: Color,
    inside: F,
) where
    F: Fn(f64, f64) -> bool,
{
    let (w, h) = (img.width() as f64, img.height() as f64);
    let x0 = (a.0.min(b.0) - margin).floor().max(0.0);
    let y0 = (a.1.min(b.1) - margin).floor().max(0.0);
    let x1 = (a.0.max(b.0) + margin).ceil().min(w - 1.0);
    let y1 = (a.1.max(b.1) + margin).ceil().min(h - 1.0);
    if x0 > x1 || y0 > y1 {
        return;
    }

    for py in y0 as u32..=y1 as u32 {
        for px in x0 as u32..=x1 as u32 {
            if inside(px as f64 + 0.5, py as f64 + 0.5) {
                blend(img.get_pixel_mut(px, py), color);
            }
        }
    }
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * abx, a.1 + t * aby);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

fn blend(pixel: &mut Rgba<u8>, color: Color) {
    let alpha = color.a as u32;
    let src = color.to_rgba();
    for i in 0..3 {
        let dst = pixel.0[i] as u32;
        pixel.0[i] = ((src[i] as u32 * alpha + dst * (255 - alpha)) / 255) as u8;
    }
    pixel.0[3] = 0xff;
}
