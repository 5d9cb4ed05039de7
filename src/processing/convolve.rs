use image::RgbImage;

/// Fixed 3x3 unsharp kernel, applied with a divisor of 16.
const SHARPEN_WEIGHTS: [f32; 9] = [
    -2.0, -2.0, -2.0, //
    -2.0, 32.0, -2.0, //
    -2.0, -2.0, -2.0,
];
const SHARPEN_SCALE: f32 = 16.0;

pub fn sharpen(image: &RgbImage) -> RgbImage {
    convolve_rgb(image, &SHARPEN_WEIGHTS, 3, SHARPEN_SCALE)
}

/// Convolves each channel with a square `side` x `side` kernel, dividing the
/// weighted sum by `scale`. Samples outside the image clamp to the nearest
/// edge pixel.
pub fn convolve_rgb(image: &RgbImage, weights: &[f32], side: usize, scale: f32) -> RgbImage {
    debug_assert_eq!(weights.len(), side * side);
    let width = image.width() as i64;
    let height = image.height() as i64;
    let radius = (side / 2) as i64;
    let mut out = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let mut acc = [0.0_f32; 3];
        for ky in 0..side as i64 {
            for kx in 0..side as i64 {
                let sx = (x as i64 + kx - radius).clamp(0, width - 1) as u32;
                let sy = (y as i64 + ky - radius).clamp(0, height - 1) as u32;
                let weight = weights[(ky * side as i64 + kx) as usize];
                let sample = image.get_pixel(sx, sy);
                for c in 0..3 {
                    acc[c] += weight * sample[c] as f32;
                }
            }
        }
        for c in 0..3 {
            pixel[c] = (acc[c] / scale + 0.5).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn identity_kernel_preserves_the_image() {
        let mut weights = [0.0_f32; 9];
        weights[4] = 1.0;
        let image = RgbImage::from_fn(5, 4, |x, y| Rgb([(x * 40) as u8, (y * 50) as u8, 7]));
        let out = convolve_rgb(&image, &weights, 3, 1.0);
        assert_eq!(out.as_raw(), image.as_raw());
    }

    #[test]
    fn sharpen_is_a_no_op_on_a_flat_field() {
        let image = RgbImage::from_pixel(8, 8, Rgb([100, 150, 200]));
        let out = sharpen(&image);
        assert_eq!(out.as_raw(), image.as_raw());
    }

    #[test]
    fn sharpen_amplifies_an_edge() {
        let image = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 { Rgb([50, 50, 50]) } else { Rgb([200, 200, 200]) }
        });
        let out = sharpen(&image);
        // The bright side of the edge overshoots, the dark side undershoots.
        assert!(out.get_pixel(4, 4)[0] > 200);
        assert!(out.get_pixel(3, 4)[0] < 50);
    }
}
