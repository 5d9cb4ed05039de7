use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use rand::Rng;

/// Hand-tuned lens-blur profile: a soft diamond weighting, strongest at the
/// center and zero at the corners.
pub const LENS_PROFILE: [[f32; 7]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0],
    [0.0, 1.0, 2.0, 4.0, 2.0, 1.0, 0.0],
    [0.0, 0.0, 1.0, 2.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

const PROFILE_SIZE: u32 = 7;
const PROFILE_PEAK: f32 = 4.0;
/// Rotation substrate; large enough that corner clipping stays mild.
const SUBSTRATE_SIZE: u32 = 17;
pub const KERNEL_SIZE: u32 = 5;

/// A synthesized blur kernel plus its normalization sum. Weights are not
/// pre-normalized; the convolution divides by `scale`.
#[derive(Debug, Clone)]
pub struct BlurKernel {
    pub weights: Vec<f32>,
    pub scale: f32,
}

/// Builds a randomly oriented blur kernel from the lens profile: upsample to
/// the rotation substrate, rotate by a uniform angle in [0°, 90°),
/// downsample to the operative 5x5 size, and raise every weight to a uniform
/// power in [0.7, 2.0].
pub fn synthesize(rng: &mut impl Rng) -> BlurKernel {
    let angle = rng.random_range(0.0_f32..90.0).to_radians();
    let power = rng.random_range(0.7_f32..2.0);

    // Float resampling clamps samples above 1.0, so the profile goes through
    // at unit peak; the constant factor cancels in the normalization sum.
    let profile: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(PROFILE_SIZE, PROFILE_SIZE, |x, y| {
            Luma([LENS_PROFILE[y as usize][x as usize] / PROFILE_PEAK])
        });
    let substrate = imageops::resize(
        &profile,
        SUBSTRATE_SIZE,
        SUBSTRATE_SIZE,
        FilterType::Triangle,
    );
    let rotated = rotate_about_center(&substrate, angle, Interpolation::Bilinear, Luma([0.0]));
    let operative = imageops::resize(&rotated, KERNEL_SIZE, KERNEL_SIZE, FilterType::Triangle);

    let weights: Vec<f32> = operative.pixels().map(|p| p.0[0].powf(power)).collect();
    let scale = weights.iter().sum::<f32>().max(f32::EPSILON);
    BlurKernel { weights, scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn kernel_is_always_5x5_and_non_negative() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let kernel = synthesize(&mut rng);
            assert_eq!(kernel.weights.len(), 25);
            assert!(kernel.scale > 0.0);
            for w in &kernel.weights {
                assert!(w.is_finite() && *w >= 0.0, "weight {w} out of range");
            }
        }
    }

    #[test]
    fn successive_kernels_differ() {
        let mut rng = StdRng::seed_from_u64(4);
        let first = synthesize(&mut rng);
        let second = synthesize(&mut rng);
        assert_ne!(first.weights, second.weights);
    }

    #[test]
    fn center_carries_the_most_mass() {
        let mut rng = StdRng::seed_from_u64(5);
        let kernel = synthesize(&mut rng);
        let center = kernel.weights[12];
        let max = kernel.weights.iter().cloned().fold(0.0_f32, f32::max);
        assert_eq!(center, max);
    }
}
