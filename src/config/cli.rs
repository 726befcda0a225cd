use crate::core::Storage;
use crate::domain::model::PlotMode;
use crate::utils::error::Result;
use image::RgbaImage;
use std::fs;
use std::path::Path;

/// Writes PNG files into a local directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct ImageStorage {
    base_path: String,
}

impl ImageStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for ImageStorage {
    fn save_png(&self, file_name: &str, image: &RgbaImage) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(file_name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        image.save_with_format(&full_path, image::ImageFormat::Png)?;
        Ok(full_path.to_string_lossy().into_owned())
    }
}

/// `img-<stem>-<mode>-<rows>-<unix time>.png`
pub fn output_file_name(input_file: &str, mode: PlotMode, row_count: usize, timestamp: i64) -> String {
    let base_name = Path::new(input_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!("img-{}-{}-{}-{}.png", base_name, mode, row_count, timestamp)
}
