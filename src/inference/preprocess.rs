//! Upload validation and image-to-tensor conversion.

use image::{DynamicImage, RgbImage, imageops::FilterType};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PestError;

/// File types accepted by the upload form.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];

/// Pixel value range fed to the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputScaling {
    /// 0..=255. EfficientNet graphs normalize internally.
    #[default]
    Raw,
    /// 0..=1.
    Unit,
}

/// NHWC float tensor with a batch dimension of one.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pub size: u32,
    pub data: Vec<f32>,
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 4] {
        [1, self.size as usize, self.size as usize, 3]
    }
}

pub fn validate_extension(filename: &str) -> Result<(), PestError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(PestError::UnsupportedImage(format!(
            "`{filename}` is not one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))),
    }
}

/// Decode an uploaded file and drop any alpha channel.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, PestError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

pub fn to_input(image: &RgbImage, size: u32, scaling: InputScaling) -> ImageTensor {
    let resized = DynamicImage::ImageRgb8(image.clone())
        .resize_exact(size, size, FilterType::CatmullRom)
        .to_rgb8();

    let scale = match scaling {
        InputScaling::Raw => 1.0,
        InputScaling::Unit => 1.0 / 255.0,
    };
    let data = resized
        .pixels()
        .flat_map(|p| p.0)
        .map(|v| f32::from(v) * scale)
        .collect();

    ImageTensor { size, data }
}
