use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::config::DegradationConfig;
use crate::error::{Error, Result};
use crate::processing::{convolve, kernel};

/// Applies the ordered capture-degradation chain to one image per call:
/// resample blur, directional kernel blur, JPEG recompression, sensor noise,
/// red-channel fringing, and tone compression. The stage order is fixed;
/// every stage draws its parameters fresh from the caller's RNG, so calls
/// are independent.
#[derive(Debug, Clone)]
pub struct DegradationPipeline {
    config: DegradationConfig,
}

impl DegradationPipeline {
    pub fn new(config: DegradationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DegradationConfig {
        &self.config
    }

    /// Degrades one image. Output dimensions always match the input; any
    /// stage failure aborts the call with no partial result.
    pub fn apply(&self, image: &RgbImage, rng: &mut impl Rng) -> Result<RgbImage> {
        let (width, height) = image.dimensions();

        let soft = resample_soften(image, self.config.downscale_factor, rng)?;
        let blurred = if self.config.blur {
            lens_blur(&soft, rng)
        } else {
            soft
        };
        let decoded = recompress(
            &blurred,
            self.config.jpeg_quality,
            self.config.jpeg_quality_cap,
            rng,
        )?;

        let mut samples: Vec<f32> = decoded.into_raw().into_iter().map(f32::from).collect();
        add_sensor_noise(&mut samples, self.config.noise_strength, rng);
        shift_red_channel(&mut samples, width, height, rng);
        Ok(quantize(
            &samples,
            width,
            height,
            self.config.dynamic_range,
            rng,
        ))
    }
}

/// Downscale by a uniform factor in [1, factor_max) and scale back up, both
/// through Lanczos. The round trip is the dominant softness-inducing step.
fn resample_soften(image: &RgbImage, factor_max: f32, rng: &mut impl Rng) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let factor = 1.0 + rng.random::<f32>() * (factor_max - 1.0);
    let small_w = (width as f32 / factor) as u32;
    let small_h = (height as f32 / factor) as u32;
    if small_w == 0 || small_h == 0 {
        return Err(Error::InvalidDimensions(format!(
            "{width}x{height} collapses at downscale factor {factor:.2}"
        )));
    }
    debug!(factor, "resample soften");
    let small = imageops::resize(image, small_w, small_h, FilterType::Lanczos3);
    Ok(imageops::resize(&small, width, height, FilterType::Lanczos3))
}

/// Fixed sharpen, then convolution with a freshly synthesized directional
/// kernel. Sharpening first reintroduces local contrast that the kernel then
/// softens anisotropically.
fn lens_blur(image: &RgbImage, rng: &mut impl Rng) -> RgbImage {
    let sharpened = convolve::sharpen(image);
    let blur = kernel::synthesize(rng);
    convolve::convolve_rgb(
        &sharpened,
        &blur.weights,
        kernel::KERNEL_SIZE as usize,
        blur.scale,
    )
}

/// Round trip through the JPEG codec at a uniform integer quality in
/// [floor, 99), clamped to `cap`.
fn recompress(image: &RgbImage, floor: u8, cap: u8, rng: &mut impl Rng) -> Result<RgbImage> {
    let span = 99.0 - floor as f32;
    let quality = (floor + (rng.random::<f32>() * span) as u8).min(cap);
    debug!(quality, "jpeg recompress");
    let mut encoded = Vec::new();
    image.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, quality))?;
    Ok(image::load_from_memory(&encoded)?.to_rgb8())
}

/// Zero-mean Gaussian noise with a per-call standard deviation drawn as
/// `strength * U(0,1)`, added per sample without clamping.
fn add_sensor_noise(samples: &mut [f32], strength: f32, rng: &mut impl Rng) {
    let sigma = strength * rng.random::<f32>();
    if sigma <= 0.0 {
        return;
    }
    debug!(sigma, "sensor noise");
    let noise = Normal::new(0.0_f32, sigma).expect("sigma is finite and non-negative");
    for sample in samples.iter_mut() {
        *sample += noise.sample(rng);
    }
}

/// Circularly shifts the red plane by 0 or 1 pixel along a randomly chosen
/// axis; green and blue stay put. Crude single-channel fringing.
fn shift_red_channel(samples: &mut [f32], width: u32, height: u32, rng: &mut impl Rng) {
    let offset = rng.random_range(0..=1_usize);
    let axis = rng.random_range(0..=1_u8);
    if offset == 0 {
        return;
    }
    let w = width as usize;
    let h = height as usize;
    let red: Vec<f32> = (0..w * h).map(|i| samples[i * 3]).collect();
    for y in 0..h {
        for x in 0..w {
            let (sy, sx) = if axis == 0 {
                ((y + h - offset) % h, x)
            } else {
                (y, (x + w - offset) % w)
            };
            samples[(y * w + x) * 3] = red[sy * w + sx];
        }
    }
}

/// Clamps samples into [0, 255], optionally compressing dynamic range with a
/// power-law remap at exponent `base + U(0, 0.6)`, and quantizes to 8 bits.
fn quantize(
    samples: &[f32],
    width: u32,
    height: u32,
    dynamic_range: Option<f32>,
    rng: &mut impl Rng,
) -> RgbImage {
    let exponent = dynamic_range.map(|base| base + rng.random_range(0.0..0.6));
    let mut raw = Vec::with_capacity(samples.len());
    for &sample in samples {
        let mut value = (sample / 255.0).clamp(0.0, 1.0);
        if let Some(exponent) = exponent {
            value = value.powf(exponent);
        }
        raw.push((value * 255.0).clamp(0.0, 255.0) as u8);
    }
    RgbImage::from_raw(width, height, raw).expect("sample count matches dimensions")
}
