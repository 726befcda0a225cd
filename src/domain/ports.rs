use crate::domain::model::{MapPath, Marker, PlotMode, PlotStyle, Region};
use crate::utils::error::Result;
use image::RgbaImage;

/// Append-only collector of map objects.
pub trait MapContext {
    fn add_marker(&mut self, marker: Marker);
    fn add_path(&mut self, path: MapPath);
    fn markers(&self) -> &[Marker];
    fn paths(&self) -> &[MapPath];
}

pub trait Renderer {
    fn render(&self) -> Result<RgbaImage>;
}

pub trait Storage {
    /// Writes `image` under the storage root and returns the full path.
    fn save_png(&self, file_name: &str, image: &RgbaImage) -> Result<String>;
}

pub trait ConfigProvider {
    fn input_file(&self) -> &str;
    fn mode(&self) -> PlotMode;
    fn limit(&self) -> usize;
    fn output_dir(&self) -> &str;
    fn image_size(&self) -> (u32, u32);
    fn region(&self) -> Region;
    fn columns(&self) -> (usize, usize);
    fn style(&self) -> &PlotStyle;
}
