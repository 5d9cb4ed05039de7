use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration as loaded from a YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub degradation: DegradationConfig,
    pub crop: CropConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.degradation.validate()?;
        self.crop.validate()
    }
}

/// Bounds for the randomized degradation stages. Read-only for the
/// pipeline's lifetime; every stage draws its per-call parameters within
/// these bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DegradationConfig {
    /// Base exponent of the tone-compression stage; `None` skips the stage.
    pub dynamic_range: Option<f32>,
    /// Lower bound of the randomized JPEG quality.
    pub jpeg_quality: u8,
    /// Upper clamp on the drawn JPEG quality, guarding against
    /// near-lossless settings.
    pub jpeg_quality_cap: u8,
    /// Upper bound of the randomized downscale ratio.
    pub downscale_factor: f32,
    /// Upper bound of the randomized noise standard deviation.
    pub noise_strength: f32,
    /// Whether the sharpen-then-directional-blur stage runs.
    pub blur: bool,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            dynamic_range: None,
            jpeg_quality: Self::default_jpeg_quality(),
            jpeg_quality_cap: Self::default_jpeg_quality_cap(),
            downscale_factor: Self::default_downscale_factor(),
            noise_strength: Self::default_noise_strength(),
            blur: true,
        }
    }
}

impl DegradationConfig {
    const fn default_jpeg_quality() -> u8 {
        40
    }

    const fn default_jpeg_quality_cap() -> u8 {
        95
    }

    const fn default_downscale_factor() -> f32 {
        2.0
    }

    const fn default_noise_strength() -> f32 {
        2.0
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::Configuration(format!(
                "jpeg-quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality_cap) {
            return Err(Error::Configuration(format!(
                "jpeg-quality-cap must be in 1..=100, got {}",
                self.jpeg_quality_cap
            )));
        }
        if !self.downscale_factor.is_finite() || self.downscale_factor < 1.0 {
            return Err(Error::Configuration(format!(
                "downscale-factor must be at least 1, got {}",
                self.downscale_factor
            )));
        }
        if !self.noise_strength.is_finite() || self.noise_strength < 0.0 {
            return Err(Error::Configuration(format!(
                "noise-strength must be non-negative, got {}",
                self.noise_strength
            )));
        }
        if let Some(exponent) = self.dynamic_range {
            if !exponent.is_finite() || exponent <= 0.0 {
                return Err(Error::Configuration(format!(
                    "dynamic-range must be a positive exponent, got {exponent}"
                )));
            }
        }
        Ok(())
    }
}

/// Target size for the variable-aspect center crop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CropConfig {
    /// Base edge length of the crop before aspect adjustment.
    pub resolution: u32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            resolution: Self::default_resolution(),
        }
    }
}

impl CropConfig {
    const fn default_resolution() -> u32 {
        512
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(Error::Configuration(
                "crop resolution must be positive".into(),
            ));
        }
        Ok(())
    }
}

pub fn from_yaml_file(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&text)?;
    Ok(config)
}
