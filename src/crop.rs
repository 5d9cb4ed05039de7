use image::RgbImage;
use image::imageops;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::CropConfig;
use crate::error::{Error, Result};

/// Aspect ratios the crop draws from, applied to the base resolution.
pub const ASPECT_RATIOS: [f32; 6] = [
    1.0,
    3.0 / 4.0,
    2.0 / 3.0,
    3.0 / 5.0,
    4.0 / 5.0,
    9.0 / 16.0,
];

/// Center crop with a randomly drawn aspect ratio. Unlike the degradation
/// pipeline, every call reseeds from the caller's seed, so identical seeds
/// yield identical crops.
#[derive(Debug, Clone)]
pub struct VariableAspectCenterCrop {
    config: CropConfig,
}

impl VariableAspectCenterCrop {
    pub fn new(config: CropConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Draws an aspect ratio, replaces one dimension of the square
    /// `resolution` target with the ratio-scaled value rounded up to a
    /// multiple of 8, and crops around the image center.
    pub fn apply(&self, image: &RgbImage, seed: u64) -> Result<RgbImage> {
        let mut rng = StdRng::seed_from_u64(seed);
        let ratio = ASPECT_RATIOS[rng.random_range(0..ASPECT_RATIOS.len())];
        let resolution = self.config.resolution;
        let scaled = ceil_to_multiple_of_8(resolution as f32 * ratio);
        let (crop_w, crop_h) = if rng.random_range(0..2_u8) == 0 {
            (scaled, resolution)
        } else {
            (resolution, scaled)
        };
        if crop_w > image.width() || crop_h > image.height() {
            return Err(Error::InvalidDimensions(format!(
                "crop {crop_w}x{crop_h} exceeds source {}x{}",
                image.width(),
                image.height()
            )));
        }
        let x = (image.width() - crop_w) / 2;
        let y = (image.height() - crop_h) / 2;
        Ok(imageops::crop_imm(image, x, y, crop_w, crop_h).to_image())
    }
}

fn ceil_to_multiple_of_8(value: f32) -> u32 {
    (value.ceil() as u32).next_multiple_of(8)
}
